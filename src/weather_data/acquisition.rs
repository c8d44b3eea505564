//! The historical acquisition loop: resolve an airport to its station, split the lookback
//! window into calendar months and fetch them one by one.

use crate::error::AirportWeatherError;
use crate::stations::directory::StationDirectory;
use crate::types::month::{Month, MonthRange};
use crate::types::observation::WeatherObservation;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::source::ObservationSource;
use bon::Builder;
use chrono::{NaiveDate, Utc};
use futures_util::{stream, StreamExt, TryStreamExt};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_YEARS_BACK: u32 = 2;

/// Parameters of a historical observation request.
///
/// # Examples
///
/// ```
/// use airport_weather::HistoricalRequest;
/// use chrono::NaiveDate;
///
/// let request = HistoricalRequest::builder()
///     .years_back(1)
///     .reference_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
///     .build();
/// assert_eq!(request.months().count(), 13);
/// assert_eq!(request.concurrency, 1);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct HistoricalRequest {
    /// Whole years to look back from the reference month.
    #[builder(default = DEFAULT_YEARS_BACK)]
    pub years_back: u32,
    /// Months fetched at the same time. `1` fetches strictly one after the other.
    #[builder(default = 1)]
    pub concurrency: usize,
    /// The "today" the window ends at. Defaults to the current UTC date.
    pub reference_date: Option<NaiveDate>,
    /// Cancels in-flight and pending months when triggered.
    pub cancellation: Option<CancellationToken>,
}

impl Default for HistoricalRequest {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl HistoricalRequest {
    /// The months this request covers, oldest first.
    pub fn months(&self) -> MonthRange {
        let today = self
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive());
        MonthRange::lookback(today, self.years_back)
    }
}

/// Fetches every observation for `iata_code` over the window described by `request`.
///
/// The station is looked up in `directory`, then one request per calendar month is sent
/// to `source`. Observations are returned oldest month first, each month in the order the
/// source delivered it. Months without data contribute nothing but do not end the walk.
///
/// The call is all-or-nothing: the first month that fails aborts the whole request and
/// no observations are returned. Nothing is retried.
///
/// # Errors
///
/// * [`crate::StationDirectoryError::UnknownAirport`] if the airport has no station.
/// * [`WeatherDataError::MonthFailed`] naming the station and month that failed.
/// * [`WeatherDataError::Cancelled`] if the request's cancellation token fires.
pub async fn fetch_historical<S: ObservationSource>(
    directory: &StationDirectory,
    source: &S,
    iata_code: &str,
    request: &HistoricalRequest,
) -> Result<Vec<WeatherObservation>, AirportWeatherError> {
    let station = directory.resolve(iata_code)?;
    let months = request.months();
    info!(
        "Fetching {} months of observations for {} (station {})",
        months.len(),
        iata_code,
        station
    );
    let observations = fetch_months(
        source,
        station,
        months,
        request.concurrency,
        request.cancellation.as_ref(),
    )
    .await?;
    info!(
        "Fetched {} observations for {} (station {})",
        observations.len(),
        iata_code,
        station
    );
    Ok(observations)
}

/// Fetches the given months for a known station and concatenates them in iteration order.
///
/// Up to `concurrency` months are in flight at once (at least one); completion order never
/// affects the output order. Same failure and cancellation behaviour as
/// [`fetch_historical`].
pub async fn fetch_months<S, I>(
    source: &S,
    station: &str,
    months: I,
    concurrency: usize,
    cancellation: Option<&CancellationToken>,
) -> Result<Vec<WeatherObservation>, WeatherDataError>
where
    S: ObservationSource,
    I: IntoIterator<Item = Month>,
{
    // `buffered` yields results in input order, so batches stay chronological.
    let batches = stream::iter(months)
        .map(|month| fetch_one_month(source, station, month))
        .buffered(concurrency.max(1))
        .try_collect::<Vec<Vec<WeatherObservation>>>();

    let batches = match cancellation {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => {
                warn!("Observation fetch for station {} cancelled", station);
                return Err(WeatherDataError::Cancelled {
                    station: station.to_string(),
                });
            }
            result = batches => result?,
        },
        None => batches.await?,
    };

    Ok(batches.into_iter().flatten().collect())
}

async fn fetch_one_month<S: ObservationSource>(
    source: &S,
    station: &str,
    month: Month,
) -> Result<Vec<WeatherObservation>, WeatherDataError> {
    info!(
        "Fetching data for station {} from {} to {}",
        station,
        month.first_day(),
        month.last_day()
    );
    source
        .fetch_month(station, month)
        .await
        .map_err(|e| WeatherDataError::MonthFailed {
            station: station.to_string(),
            month,
            source: Box::new(e),
        })
}
