use crate::forecast::error::ForecastError;
use crate::types::coordinates::LatLon;
use crate::types::forecast::{ForecastPeriod, ForecastSource};
use std::future::Future;

/// A weather service that can produce a forecast for a coordinate.
///
/// Implemented by [`crate::NwsClient`] (NOAA) and [`crate::OpenWeatherMapClient`].
pub trait ForecastFetcher {
    /// Which service this fetcher talks to.
    fn source(&self) -> ForecastSource;

    /// Fetches the upcoming forecast periods for `location`, earliest first.
    fn fetch_forecast(
        &self,
        location: LatLon,
    ) -> impl Future<Output = Result<Vec<ForecastPeriod>, ForecastError>> + Send;
}
