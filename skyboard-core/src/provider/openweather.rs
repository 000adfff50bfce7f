use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::instrument;

use crate::{
    config::ClientConfig,
    envelope,
    error::{EnvelopeError, WeatherError},
    model::{
        AirQuality, AqiLevel, Coordinates, CurrentConditions, Forecast, Place, Pollutants,
        TimezoneOffset, WeatherSample,
    },
};

use super::WeatherProvider;

const DEFAULT_ICON: &str = "01d";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: ClientConfig,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: ClientConfig) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// GET `endpoint`, run the body through the envelope check, decode as `T`.
    async fn get_validated<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut query: Vec<(&'static str, String)>,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        query.push(("appid", self.config.api_key.clone()));

        let res = self.http.get(&url).query(&query).send().await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%url, %status, bytes = body.len(), "OpenWeather response");

        Ok(envelope::validate_as(&body, status.as_u16())?)
    }

    fn place_query(place: &Place) -> Vec<(&'static str, String)> {
        let mut query = place.query_pairs();
        query.push(("units", "metric".to_string()));
        query
    }

    #[instrument(skip(self, place), fields(place = %place))]
    async fn fetch_current(&self, place: &Place) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse =
            self.get_validated("weather", Self::place_query(place)).await?;
        Ok(parsed.into())
    }

    #[instrument(skip(self, place), fields(place = %place))]
    async fn fetch_forecast(&self, place: &Place) -> Result<Forecast, WeatherError> {
        let parsed: OwForecastResponse =
            self.get_validated("forecast", Self::place_query(place)).await?;
        Ok(parsed.into_forecast())
    }

    #[instrument(skip(self))]
    async fn fetch_air_quality(&self, coordinates: Coordinates) -> Result<AirQuality, WeatherError> {
        let query = vec![
            ("lat", coordinates.lat.to_string()),
            ("lon", coordinates.lon.to_string()),
        ];
        let parsed: OwAirResponse = self.get_validated("air_pollution", query).await?;
        Ok(parsed.into_air_quality()?)
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    coord: Option<OwCoord>,
    #[serde(default)]
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
    timezone: Option<i64>,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(raw: OwCurrentResponse) -> Self {
        let first = raw.weather.into_iter().next();
        let (description, icon) = match first {
            Some(w) => (w.description, w.icon),
            None => (None, None),
        };

        CurrentConditions {
            location_name: raw.name,
            coordinates: raw.coord.map(|c| Coordinates { lat: c.lat, lon: c.lon }),
            temperature_c: raw.main.temp,
            feels_like_c: raw.main.feels_like.unwrap_or(raw.main.temp),
            description: description.unwrap_or_default().to_lowercase(),
            icon_code: icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            humidity_pct: raw.main.humidity.unwrap_or_default(),
            pressure_hpa: raw.main.pressure.unwrap_or_default(),
            wind_speed_mps: raw.wind.and_then(|w| w.speed).unwrap_or_default(),
            sunrise_utc: raw.sys.as_ref().and_then(|s| s.sunrise),
            sunset_utc: raw.sys.as_ref().and_then(|s| s.sunset),
            observed_at_utc: raw.dt,
            timezone: TimezoneOffset::new(raw.timezone.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: Option<String>,
    timezone: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwEntryMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwEntryMain,
    weather: Vec<OwWeather>,
}

impl OwForecastEntry {
    fn into_sample(self) -> Option<WeatherSample> {
        let first = self.weather.into_iter().next()?;
        Some(WeatherSample {
            timestamp_utc: self.dt,
            temperature_c: self.main.temp,
            icon_code: first.icon?,
            description: first.description?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: Option<OwCity>,
    /// Kept untyped so one malformed entry does not sink the batch.
    #[serde(default)]
    list: Value,
}

impl OwForecastResponse {
    fn into_forecast(self) -> Forecast {
        let entries = match self.list {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(kind = json_kind(&other), "forecast list is not an array");
                Vec::new()
            }
        };

        let samples = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let sample = serde_json::from_value::<OwForecastEntry>(entry)
                    .ok()
                    .and_then(OwForecastEntry::into_sample);
                if sample.is_none() {
                    tracing::warn!(index = idx, "dropping malformed forecast entry");
                }
                sample
            })
            .collect();

        let (city_name, timezone) = match self.city {
            Some(city) => (city.name, city.timezone.unwrap_or_default()),
            None => (None, 0),
        };

        Forecast { city_name, timezone: TimezoneOffset::new(timezone), samples }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAqi,
    #[serde(default)]
    components: Pollutants,
    #[serde(default)]
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

impl OwAirResponse {
    fn into_air_quality(self) -> Result<AirQuality, EnvelopeError> {
        let entry = self
            .list
            .into_iter()
            .next()
            .ok_or_else(|| EnvelopeError::Decode("air quality response contained no data".into()))?;

        let level = AqiLevel::from_index(entry.main.aqi).ok_or_else(|| {
            EnvelopeError::Decode(format!("air quality index {} out of range", entry.main.aqi))
        })?;

        Ok(AirQuality { level, pollutants: entry.components, measured_at_utc: entry.dt })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, place: &Place) -> Result<CurrentConditions, WeatherError> {
        self.fetch_current(place).await
    }

    async fn forecast(&self, place: &Place) -> Result<Forecast, WeatherError> {
        self.fetch_forecast(place).await
    }

    async fn air_quality(&self, coordinates: Coordinates) -> Result<AirQuality, WeatherError> {
        self.fetch_air_quality(coordinates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fetch_weather;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        let config = ClientConfig::new("TEST_KEY").with_base_url(server.uri());
        OpenWeatherProvider::new(config).expect("client builds")
    }

    fn current_body() -> Value {
        json!({
            "coord": {"lon": 2.35, "lat": 48.85},
            "weather": [{"id": 500, "main": "Rain", "description": "Light Rain", "icon": "10d"}],
            "main": {"temp": 12.6, "feels_like": 11.9, "pressure": 1012, "humidity": 81},
            "wind": {"speed": 5.1, "deg": 240},
            "sys": {"country": "FR", "sunrise": 1700028000, "sunset": 1700061000},
            "timezone": 3600,
            "name": "Paris",
            "dt": 1700040000,
            "cod": 200
        })
    }

    fn forecast_entry(dt: i64, temp: f64, icon: &str, desc: &str) -> Value {
        json!({
            "dt": dt,
            "main": {"temp": temp, "humidity": 70},
            "weather": [{"description": desc, "icon": icon}]
        })
    }

    #[tokio::test]
    async fn current_by_city_maps_fields() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let current = provider.current(&Place::city("Paris").unwrap()).await.unwrap();

        assert_eq!(current.location_name, "Paris");
        assert_eq!(current.coordinates, Some(Coordinates { lat: 48.85, lon: 2.35 }));
        assert_eq!(current.temperature_c, 12.6);
        assert_eq!(current.description, "light rain");
        assert_eq!(current.icon_code, "10d");
        assert_eq!(current.humidity_pct, 81);
        assert_eq!(current.pressure_hpa, 1012.0);
        assert_eq!(current.wind_speed_mps, 5.1);
        assert_eq!(current.sunrise_utc, Some(1_700_028_000));
        assert_eq!(current.timezone, TimezoneOffset::new(3_600));
    }

    #[tokio::test]
    async fn current_by_coordinates_uses_lat_lon() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let place = Place::coordinates(48.85, 2.35).unwrap();

        assert!(provider.current(&place).await.is_ok());
    }

    #[tokio::test]
    async fn current_without_weather_entry_uses_defaults() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 3.0},
                "weather": [],
                "name": "Tromsø"
            })))
            .mount(&server)
            .await;

        let current = provider_for(&server)
            .current(&Place::city("Tromsø").unwrap())
            .await
            .unwrap();

        assert_eq!(current.icon_code, "01d");
        assert_eq!(current.description, "");
        assert_eq!(current.wind_speed_mps, 0.0);
        assert_eq!(current.feels_like_c, 3.0);
        assert_eq!(current.timezone, TimezoneOffset::UTC);
    }

    #[tokio::test]
    async fn api_error_on_http_200_is_classified() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current(&Place::city("Atlantis").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WeatherError::Envelope(EnvelopeError::Api { ref message }) if message == "city not found"
        ));
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"cod": 401, "message": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current(&Place::city("Paris").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WeatherError::Envelope(EnvelopeError::Transport { status_code: 401, message: Some(_) })
        ));
    }

    #[tokio::test]
    async fn server_error_with_html_body_has_no_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<h1>down</h1>"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .forecast(&Place::city("Paris").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WeatherError::Envelope(EnvelopeError::Transport { status_code: 503, message: None })
        ));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current(&Place::city("Paris").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Envelope(EnvelopeError::Decode(_))));
    }

    #[tokio::test]
    async fn current_missing_main_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": 200, "weather": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current(&Place::city("Paris").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Envelope(EnvelopeError::Decode(_))));
    }

    #[tokio::test]
    async fn forecast_reads_timezone_and_drops_malformed_entries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "message": 0,
                "cnt": 4,
                "list": [
                    forecast_entry(1_700_000_000, 9.4, "04n", "broken clouds"),
                    {"dt": 1_700_010_800, "main": {}, "weather": [{"description": "x", "icon": "01d"}]},
                    {"dt": 1_700_021_600, "main": {"temp": 8.0}, "weather": []},
                    forecast_entry(1_700_032_400, 11.0, "10d", "light rain")
                ],
                "city": {"name": "Paris", "country": "FR", "timezone": 3600}
            })))
            .mount(&server)
            .await;

        let forecast = provider_for(&server)
            .forecast(&Place::city("Paris").unwrap())
            .await
            .unwrap();

        assert_eq!(forecast.city_name.as_deref(), Some("Paris"));
        assert_eq!(forecast.timezone, TimezoneOffset::new(3_600));

        let stamps: Vec<_> = forecast.samples.iter().map(|s| s.timestamp_utc).collect();
        assert_eq!(stamps, [1_700_000_000, 1_700_032_400]);
        assert_eq!(forecast.samples[1].description, "light rain");
    }

    #[tokio::test]
    async fn forecast_without_list_or_city_is_empty_utc() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": "200", "list": "nope"})))
            .mount(&server)
            .await;

        let forecast = provider_for(&server)
            .forecast(&Place::city("Paris").unwrap())
            .await
            .unwrap();

        assert!(forecast.samples.is_empty());
        assert_eq!(forecast.timezone, TimezoneOffset::UTC);
    }

    #[tokio::test]
    async fn air_quality_maps_index_and_components() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .and(query_param("appid", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "coord": {"lon": 2.35, "lat": 48.85},
                "list": [{
                    "main": {"aqi": 3},
                    "components": {"co": 230.3, "no2": 14.2, "o3": 60.1, "pm2_5": 8.5, "pm10": 12.0},
                    "dt": 1_700_040_000
                }]
            })))
            .mount(&server)
            .await;

        let air = provider_for(&server)
            .air_quality(Coordinates { lat: 48.85, lon: 2.35 })
            .await
            .unwrap();

        assert_eq!(air.level, AqiLevel::Moderate);
        assert_eq!(air.pollutants.pm2_5, 8.5);
        assert_eq!(air.pollutants.nh3, 0.0);
        assert_eq!(air.measured_at_utc, 1_700_040_000);
    }

    #[tokio::test]
    async fn air_quality_with_empty_list_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .air_quality(Coordinates { lat: 0.0, lon: 0.0 })
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Envelope(EnvelopeError::Decode(_))));
    }

    #[tokio::test]
    async fn network_error_does_not_leak_api_key() {
        let config = ClientConfig::new("SECRET_KEY_123").with_base_url("http://127.0.0.1:1");
        let provider = OpenWeatherProvider::new(config).expect("client builds");

        let err = provider
            .air_quality(Coordinates { lat: 1.0, lon: 2.0 })
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Network(_)));
        assert!(!err.to_string().contains("SECRET_KEY_123"));
        assert!(!format!("{err:?}").contains("SECRET_KEY_123"));
    }

    #[tokio::test]
    async fn fetch_weather_hits_both_endpoints() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "list": [forecast_entry(1_700_000_000, 9.4, "04n", "broken clouds")],
                "city": {"name": "Paris", "timezone": 3600}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let report = fetch_weather(&provider_for(&server), &Place::city("Paris").unwrap())
            .await
            .unwrap();

        assert_eq!(report.current.location_name, "Paris");
        assert_eq!(report.forecast.samples.len(), 1);
    }
}
