use crate::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    // The service answered 200 but reported an error in the body.
    #[error("{url} reported error {code}: {message}")]
    Api {
        url: String,
        code: String,
        message: String,
    },

    #[error("No airport data found for IATA code '{0}'")]
    AirportNotFound(String),

    #[error("Airport '{iata_code}' has an unreadable {field}: {value}")]
    InvalidCoordinate {
        iata_code: String,
        field: &'static str,
        value: String,
    },

    #[error("Forecast period from {url} has an invalid timestamp {timestamp}")]
    InvalidTimestamp { url: String, timestamp: i64 },
}

impl ForecastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::HttpClient(_) | ForecastError::MissingApiKey(_) => {
                ErrorKind::Configuration
            }
            ForecastError::AirportNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Upstream,
        }
    }
}
