use crate::error::ErrorKind;
use crate::types::month::Month;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse observations returned by {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Field {field} of observation at {date} has unreadable value '{value}'")]
    InvalidMeasurement {
        field: &'static str,
        date: String,
        value: String,
    },

    // Wraps whatever went wrong for one month so callers know which request to retry.
    #[error("Fetching observations for station {station} from {} to {} failed", .month.first_day(), .month.last_day())]
    MonthFailed {
        station: String,
        month: Month,
        #[source]
        source: Box<WeatherDataError>,
    },

    #[error("Fetching observations for station {station} was cancelled")]
    Cancelled { station: String },
}

impl WeatherDataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherDataError::HttpClient(_) => ErrorKind::Configuration,
            WeatherDataError::MonthFailed { source, .. } => source.kind(),
            WeatherDataError::Cancelled { .. } => ErrorKind::Cancelled,
            _ => ErrorKind::Upstream,
        }
    }
}
