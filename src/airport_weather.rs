//! This module provides the main entry point of the crate. It allows fetching historical
//! observations, coordinates and forecasts for an airport given its IATA code.

use crate::config::ApiConfig;
use crate::error::AirportWeatherError;
use crate::forecast::coordinates::AviationstackClient;
use crate::forecast::error::ForecastError;
use crate::forecast::fetcher::ForecastFetcher;
use crate::forecast::noaa::NwsClient;
use crate::forecast::open_weather_map::OpenWeatherMapClient;
use crate::stations::directory::StationDirectory;
use crate::types::coordinates::LatLon;
use crate::types::forecast::{AirportForecast, ForecastPeriod};
use crate::types::observation::WeatherObservation;
use crate::weather_data::acquisition::{fetch_historical, HistoricalRequest};
use crate::weather_data::ncei_client::NceiClient;
use bon::bon;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The main client struct for airport weather data.
///
/// It owns the station directory (shared, read-only) and one HTTP client per upstream
/// service. Create it with [`AirportWeather::builder()`]; every setting is optional.
///
/// * Historical observations come from NOAA NCEI and need no key.
/// * Forecasts come from NOAA (`api.weather.gov`) and, when configured, OpenWeatherMap.
/// * Coordinates come from aviationstack and need an access key.
///
/// # Examples
///
/// ```rust
/// # use airport_weather::{AirportWeather, AirportWeatherError, ApiConfig};
/// # fn run() -> Result<(), AirportWeatherError> {
/// let client = AirportWeather::builder()
///     .user_agent("my-app (ops@example.com)")
///     .aviationstack(ApiConfig::aviationstack("YOUR_KEY"))
///     .build()?;
/// assert_eq!(client.resolve_station("jfk")?, "USW00094789");
/// # Ok(())
/// # }
/// ```
pub struct AirportWeather {
    directory: Arc<StationDirectory>,
    ncei: NceiClient,
    nws: NwsClient,
    aviationstack: Option<AviationstackClient>,
    open_weather_map: Option<OpenWeatherMapClient>,
}

#[bon]
impl AirportWeather {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.directory(StationDirectory)`: Optional. Defaults to [`StationDirectory::builtin()`].
    /// * `.ncei(ApiConfig)`: Optional. Defaults to [`ApiConfig::ncei()`].
    /// * `.nws(ApiConfig)`: Optional. Defaults to [`ApiConfig::nws()`].
    /// * `.aviationstack(ApiConfig)`: Optional. Without it, coordinate lookups fail with a
    ///   configuration error.
    /// * `.open_weather_map(ApiConfig)`: Optional. Without it, airport forecasts only
    ///   contain NOAA periods.
    /// * `.user_agent(String)`: Optional. Replaces the user agent of every config above.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an HTTP client cannot be built or a service that
    /// needs a key was configured without one.
    #[builder]
    pub fn new(
        #[builder(into)] directory: Option<Arc<StationDirectory>>,
        ncei: Option<ApiConfig>,
        nws: Option<ApiConfig>,
        aviationstack: Option<ApiConfig>,
        open_weather_map: Option<ApiConfig>,
        #[builder(into)] user_agent: Option<String>,
    ) -> Result<Self, AirportWeatherError> {
        let with_agent = |config: ApiConfig| match &user_agent {
            Some(agent) => config.with_user_agent(agent.clone()),
            None => config,
        };

        let ncei = NceiClient::new(with_agent(ncei.unwrap_or_else(ApiConfig::ncei)))?;
        let nws = NwsClient::new(with_agent(nws.unwrap_or_else(ApiConfig::nws)))?;
        let aviationstack = aviationstack
            .map(|config| AviationstackClient::new(with_agent(config)))
            .transpose()?;
        let open_weather_map = open_weather_map
            .map(|config| OpenWeatherMapClient::new(with_agent(config)))
            .transpose()?;

        Ok(Self {
            directory: directory.unwrap_or_else(|| Arc::new(StationDirectory::builtin())),
            ncei,
            nws,
            aviationstack,
            open_weather_map,
        })
    }

    /// Creates a client with default endpoints whose station directory is loaded from the
    /// CSV file at `path` (see [`StationDirectory::from_csv`]).
    pub async fn from_station_csv(path: impl AsRef<Path>) -> Result<Self, AirportWeatherError> {
        let directory = StationDirectory::from_csv(path).await?;
        Self::builder().directory(directory).build()
    }

    /// The station directory used to resolve IATA codes.
    pub fn station_directory(&self) -> &StationDirectory {
        &self.directory
    }

    /// Resolves an IATA code to its historical weather station id.
    pub fn resolve_station(&self, iata_code: &str) -> Result<&str, AirportWeatherError> {
        Ok(self.directory.resolve(iata_code)?)
    }

    /// Fetches historical hourly observations for an airport, month by month.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `iata_code`: **Required.** Passed to `historical(...)` directly.
    /// * `.years_back(u32)`: Optional. Whole years to look back. Defaults to `2`.
    /// * `.concurrency(usize)`: Optional. Months fetched at once. Defaults to `1`.
    /// * `.reference_date(NaiveDate)`: Optional. The date the window ends at. Defaults to today (UTC).
    /// * `.cancellation(CancellationToken)`: Optional. Aborts the request when cancelled.
    ///
    /// # Returns
    ///
    /// All observations in the window, oldest month first. The request is all-or-nothing:
    /// if any month fails, an error naming the station and month is returned instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use airport_weather::{AirportWeather, AirportWeatherError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), AirportWeatherError> {
    /// let client = AirportWeather::builder().build()?;
    /// let observations = client.historical("JFK").years_back(1).concurrency(4).call().await?;
    /// println!("Fetched {} observations", observations.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn historical(
        &self,
        #[builder(start_fn)] iata_code: &str,
        years_back: Option<u32>,
        concurrency: Option<usize>,
        reference_date: Option<NaiveDate>,
        cancellation: Option<CancellationToken>,
    ) -> Result<Vec<WeatherObservation>, AirportWeatherError> {
        let request = HistoricalRequest::builder()
            .maybe_years_back(years_back)
            .maybe_concurrency(concurrency)
            .maybe_reference_date(reference_date)
            .maybe_cancellation(cancellation)
            .build();
        fetch_historical(&self.directory, &self.ncei, iata_code, &request).await
    }

    /// Looks up the coordinates of an airport.
    pub async fn coordinates(&self, iata_code: &str) -> Result<LatLon, AirportWeatherError> {
        let client = self
            .aviationstack
            .as_ref()
            .ok_or(ForecastError::MissingApiKey("aviationstack"))?;
        Ok(client.resolve_coordinates(iata_code).await?)
    }

    /// NOAA forecast periods for a coordinate.
    pub async fn forecast(&self, location: LatLon) -> Result<Vec<ForecastPeriod>, AirportWeatherError> {
        Ok(self.nws.fetch_forecast(location).await?)
    }

    /// Resolves the airport's coordinates, then fetches the NOAA forecast and, if
    /// configured, the OpenWeatherMap forecast at the same time. Both must succeed.
    pub async fn airport_forecast(&self, iata_code: &str) -> Result<AirportForecast, AirportWeatherError> {
        let coordinates = self.coordinates(iata_code).await?;

        let (noaa, open_weather_map) = match &self.open_weather_map {
            Some(owm) => {
                let (noaa, owm) = tokio::join!(
                    self.nws.fetch_forecast(coordinates),
                    owm.fetch_forecast(coordinates)
                );
                (noaa?, Some(owm?))
            }
            None => (self.nws.fetch_forecast(coordinates).await?, None),
        };

        Ok(AirportForecast {
            iata_code: iata_code.trim().to_uppercase(),
            coordinates,
            noaa,
            open_weather_map,
        })
    }
}
