use crate::forecast::error::ForecastError;
use crate::stations::error::StationDirectoryError;
use crate::weather_data::error::WeatherDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirportWeatherError {
    #[error(transparent)]
    StationDirectory(#[from] StationDirectoryError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Coarse classification of every error this crate returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No station or airport is known for the requested code.
    NotFound,
    /// A remote service failed, timed out, or answered with something unreadable.
    Upstream,
    /// Missing credentials, an unusable station mapping file, or a client that could not be built.
    Configuration,
    /// The caller cancelled the request.
    Cancelled,
}

impl AirportWeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AirportWeatherError::StationDirectory(e) => e.kind(),
            AirportWeatherError::WeatherData(e) => e.kind(),
            AirportWeatherError::Forecast(e) => e.kind(),
        }
    }
}
