use crate::error::ErrorKind;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationDirectoryError {
    #[error("No weather station known for IATA code '{0}'")]
    UnknownAirport(String),

    #[error("Failed to read station mapping CSV '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Station mapping CSV '{path}' has no usable '{column}' column")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Station mapping CSV '{path}' has an empty cell on data row {row}")]
    MalformedRow { path: PathBuf, row: usize },

    // Covers errors joining tokio blocking tasks
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl StationDirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StationDirectoryError::UnknownAirport(_) => ErrorKind::NotFound,
            _ => ErrorKind::Configuration,
        }
    }
}
