use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{AirQuality, Coordinates, CurrentConditions, Forecast, Place, WeatherReport},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A source of validated weather payloads.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, place: &Place) -> Result<CurrentConditions, WeatherError>;

    async fn forecast(&self, place: &Place) -> Result<Forecast, WeatherError>;

    async fn air_quality(&self, coordinates: Coordinates) -> Result<AirQuality, WeatherError>;
}

/// Fetch current conditions, then the forecast. The first failure aborts.
pub async fn fetch_weather<P>(provider: &P, place: &Place) -> Result<WeatherReport, WeatherError>
where
    P: WeatherProvider + ?Sized,
{
    let current = provider.current(place).await?;
    let forecast = provider.forecast(place).await?;

    Ok(WeatherReport { current, forecast })
}
