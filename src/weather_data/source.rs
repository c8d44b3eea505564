use crate::types::month::Month;
use crate::types::observation::WeatherObservation;
use crate::weather_data::error::WeatherDataError;
use std::future::Future;

/// Something that can deliver one calendar month of observations for a station.
///
/// [`crate::NceiClient`] is the production implementation; the acquisition loop only
/// depends on this trait, so it can be driven by any other source.
pub trait ObservationSource {
    /// Fetches every observation recorded by `station` between the first and the last
    /// day of `month`, in the order the source returns them. An empty month is `Ok(vec![])`.
    fn fetch_month(
        &self,
        station: &str,
        month: Month,
    ) -> impl Future<Output = Result<Vec<WeatherObservation>, WeatherDataError>> + Send;
}
