//! One search, start to finish: fetch, classify, aggregate, present.

use chrono::Utc;

use crate::{
    aggregate::aggregate,
    error::WeatherError,
    location::LocationProvider,
    model::{Place, WeatherReport},
    prefs::{self, Theme},
    present::{CurrentView, PresentationSink},
    provider::WeatherProvider,
    store::KeyValueStore,
};

const FALLBACK_LOCATION_LABEL: &str = "Your Location";

pub struct Dashboard<P, S> {
    provider: P,
    store: S,
}

impl<P, S> Dashboard<P, S>
where
    P: WeatherProvider,
    S: KeyValueStore,
{
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Render current conditions, forecast, and air quality for `place`.
    ///
    /// A current-conditions failure ends the search. A forecast failure is
    /// reported and returned once air quality has been shown; an air-quality
    /// failure only affects its own section.
    pub async fn search<K>(&mut self, place: &Place, sink: &mut K) -> Result<WeatherReport, WeatherError>
    where
        K: PresentationSink + ?Sized,
    {
        tracing::info!(%place, "searching");

        let current = match self.provider.current(place).await {
            Ok(current) => current,
            Err(e) => return Err(report(sink, e)),
        };

        sink.show_current(&CurrentView::build(&current, self.theme(), Utc::now().timestamp()));
        self.remember(place, &current.location_name, sink);

        let forecast = match self.provider.forecast(place).await {
            Ok(forecast) => {
                sink.show_forecast(&aggregate(&forecast.samples, forecast.timezone));
                Ok(forecast)
            }
            Err(e) => Err(report(sink, e)),
        };

        let coordinates = current.coordinates.or(match place {
            Place::Coordinates(c) => Some(*c),
            Place::City(_) => None,
        });

        if let Some(coordinates) = coordinates {
            match self.provider.air_quality(coordinates).await {
                Ok(air) => sink.show_air_quality(&air),
                Err(e) => {
                    tracing::warn!(error = %e, "air quality unavailable");
                    sink.air_quality_unavailable(&e);
                }
            }
        }

        Ok(WeatherReport { current, forecast: forecast? })
    }

    /// Like [`search`](Self::search), for wherever `location` says we are.
    pub async fn search_here<L, K>(
        &mut self,
        location: &L,
        sink: &mut K,
    ) -> Result<WeatherReport, WeatherError>
    where
        L: LocationProvider + ?Sized,
        K: PresentationSink + ?Sized,
    {
        let place = match location.locate().await {
            Ok(c) => Place::coordinates(c.lat, c.lon),
            Err(e) => Err(e.into()),
        };

        match place {
            Ok(place) => self.search(&place, sink).await,
            Err(e) => Err(report(sink, e)),
        }
    }

    fn theme(&self) -> Theme {
        prefs::theme(&self.store).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read theme preference");
            Theme::default()
        })
    }

    fn remember<K>(&mut self, place: &Place, reported_name: &str, sink: &mut K)
    where
        K: PresentationSink + ?Sized,
    {
        let label = match place {
            Place::City(name) => name.as_str(),
            Place::Coordinates(_) if !reported_name.is_empty() => reported_name,
            Place::Coordinates(_) => FALLBACK_LOCATION_LABEL,
        };

        match prefs::record_search(&mut self.store, label) {
            Ok(recent) => sink.show_recent(&recent),
            Err(e) => tracing::warn!(error = %e, "could not save recent search"),
        }
    }
}

fn report<K: PresentationSink + ?Sized>(sink: &mut K, error: WeatherError) -> WeatherError {
    tracing::debug!(error = %error, "search failed");
    sink.show_error(&error);
    error
}
