//! Maps IATA airport codes to historical weather station identifiers.
//!
//! A [`StationDirectory`] is built once (from the builtin table, from in-memory entries, or
//! from a CSV file) and is read-only afterwards, so it can be shared freely between
//! concurrent requests.

use crate::stations::error::StationDirectoryError;
use log::{debug, info};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tokio::task;

const IATA_COLUMN: &str = "iata_code";
const STATION_COLUMN: &str = "station_id";

/// NCEI global-hourly station ids for the airports known out of the box.
const BUILTIN_STATIONS: &[(&str, &str)] = &[("JFK", "USW00094789"), ("LAX", "USW00023174")];

/// Read-only lookup table from IATA code to weather station identifier.
///
/// Lookups are case-insensitive: codes are trimmed and uppercased both when the table is
/// built and when it is queried.
///
/// # Examples
///
/// ```
/// use airport_weather::StationDirectory;
///
/// let directory = StationDirectory::from_entries([("jfk", "S1")]);
/// assert_eq!(directory.resolve("JFK").unwrap(), "S1");
/// assert_eq!(directory.resolve("jfk").unwrap(), "S1");
/// assert!(directory.resolve("LAX").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: HashMap<String, String>,
}

impl StationDirectory {
    /// The small table shipped with the crate (JFK and LAX).
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_STATIONS.iter().copied())
    }

    /// Builds a directory from `(iata_code, station_id)` pairs. Later pairs replace earlier
    /// ones with the same code.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut stations = HashMap::new();
        for (iata_code, station_id) in entries {
            insert_station(&mut stations, iata_code.as_ref(), station_id.into());
        }
        Self { stations }
    }

    /// Loads a directory from a CSV file with a header row and the columns `iata_code` and
    /// `station_id`. Other columns are ignored.
    ///
    /// When the same IATA code appears on several rows, the last row wins; the earlier
    /// station ids are dropped without raising an error.
    ///
    /// # Errors
    ///
    /// * [`StationDirectoryError::CsvRead`] if the file is missing or is not valid CSV.
    /// * [`StationDirectoryError::MissingColumn`] if a required column is absent.
    /// * [`StationDirectoryError::MalformedRow`] if a required cell is empty.
    pub async fn from_csv(path: impl AsRef<Path>) -> Result<Self, StationDirectoryError> {
        let path = path.as_ref().to_path_buf();
        let path_clone = path.clone();
        let directory = task::spawn_blocking(move || Self::read_csv(&path_clone)).await??;
        info!(
            "Loaded {} airport station mappings from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    fn read_csv(path: &Path) -> Result<Self, StationDirectoryError> {
        // Infer nothing: every column is read as text so station ids keep leading zeros.
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| StationDirectoryError::CsvRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| StationDirectoryError::CsvRead(path.to_path_buf(), e))?;

        let iata_codes = string_column(&df, path, IATA_COLUMN)?;
        let station_ids = string_column(&df, path, STATION_COLUMN)?;

        let mut stations = HashMap::with_capacity(df.height());
        for (index, (iata_code, station_id)) in iata_codes.into_iter().zip(station_ids).enumerate() {
            let (Some(iata_code), Some(station_id)) = (iata_code, station_id) else {
                return Err(malformed_row(path, index));
            };
            let station_id = station_id.trim();
            if iata_code.trim().is_empty() || station_id.is_empty() {
                return Err(malformed_row(path, index));
            }
            insert_station(&mut stations, iata_code, station_id.to_string());
        }

        Ok(Self { stations })
    }

    /// Returns the station id for `iata_code`.
    ///
    /// # Errors
    ///
    /// [`StationDirectoryError::UnknownAirport`] if the code has no entry.
    pub fn resolve(&self, iata_code: &str) -> Result<&str, StationDirectoryError> {
        let key = normalize_code(iata_code);
        match self.stations.get(&key) {
            Some(station_id) => Ok(station_id),
            None => Err(StationDirectoryError::UnknownAirport(key)),
        }
    }

    pub fn contains(&self, iata_code: &str) -> bool {
        self.stations.contains_key(&normalize_code(iata_code))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Iterates `(iata_code, station_id)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stations
            .iter()
            .map(|(code, station)| (code.as_str(), station.as_str()))
    }
}

fn normalize_code(iata_code: &str) -> String {
    iata_code.trim().to_uppercase()
}

fn insert_station(stations: &mut HashMap<String, String>, iata_code: &str, station_id: String) {
    let key = normalize_code(iata_code);
    if let Some(previous) = stations.insert(key.clone(), station_id) {
        debug!(
            "Duplicate station mapping for {}: replaced {} with {}",
            key, previous, stations[&key]
        );
    }
}

fn string_column<'a>(
    df: &'a DataFrame,
    path: &Path,
    column: &'static str,
) -> Result<&'a StringChunked, StationDirectoryError> {
    df.column(column)
        .and_then(|c| c.str())
        .map_err(|source| StationDirectoryError::MissingColumn {
            path: path.to_path_buf(),
            column,
            source,
        })
}

// Rows are reported 1-based, counting data rows after the header.
fn malformed_row(path: &Path, index: usize) -> StationDirectoryError {
    StationDirectoryError::MalformedRow {
        path: path.to_path_buf(),
        row: index + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_builtin_table() {
        let directory = StationDirectory::builtin();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.resolve("JFK").unwrap(), "USW00094789");
        assert_eq!(directory.resolve("lax").unwrap(), "USW00023174");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let directory = StationDirectory::from_entries([("JFK", "S1")]);
        assert_eq!(directory.resolve("jfk").unwrap(), "S1");
        assert_eq!(directory.resolve("JFK").unwrap(), "S1");
        assert_eq!(directory.resolve(" Jfk ").unwrap(), "S1");
        assert!(directory.contains("jFk"));

        match directory.resolve("lax") {
            Err(StationDirectoryError::UnknownAirport(code)) => assert_eq!(code, "LAX"),
            other => panic!("Expected UnknownAirport, got {:?}", other),
        }
    }

    #[test]
    fn test_from_entries_last_wins() {
        let directory = StationDirectory::from_entries([("sfo", "A"), ("SFO", "B")]);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.resolve("SFO").unwrap(), "B");
    }

    #[tokio::test]
    async fn test_from_csv_uppercases_codes() -> Result<(), StationDirectoryError> {
        let file = csv_file("iata_code,station_id\njfk,USW00094789\nOrd,72530094846\n");
        let directory = StationDirectory::from_csv(file.path()).await?;

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.resolve("JFK")?, "USW00094789");
        assert_eq!(directory.resolve("ord")?, "72530094846");
        Ok(())
    }

    #[tokio::test]
    async fn test_from_csv_duplicate_code_keeps_last_row() -> Result<(), StationDirectoryError> {
        let file = csv_file("iata_code,station_id\nJFK,FIRST\nLAX,USW00023174\njfk,LAST\n");
        let directory = StationDirectory::from_csv(file.path()).await?;

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.resolve("JFK")?, "LAST");
        Ok(())
    }

    #[tokio::test]
    async fn test_from_csv_keeps_station_ids_as_text() -> Result<(), StationDirectoryError> {
        let file = csv_file("station_id,name,iata_code\n00012345,Somewhere,ABC\n");
        let directory = StationDirectory::from_csv(file.path()).await?;

        assert_eq!(directory.resolve("ABC")?, "00012345");
        Ok(())
    }

    #[tokio::test]
    async fn test_from_csv_missing_column() {
        let file = csv_file("iata_code,wmo\nJFK,74486\n");
        let result = StationDirectory::from_csv(file.path()).await;

        assert!(matches!(
            result,
            Err(StationDirectoryError::MissingColumn {
                column: "station_id",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_from_csv_empty_cell_is_malformed() {
        let file = csv_file("iata_code,station_id\nJFK,USW00094789\nLAX,\n");
        let result = StationDirectory::from_csv(file.path()).await;

        match result {
            Err(StationDirectoryError::MalformedRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("Expected MalformedRow, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_from_csv_missing_file() {
        let result = StationDirectory::from_csv("/definitely/not/here/stations.csv").await;
        assert!(matches!(result, Err(StationDirectoryError::CsvRead(..))));
    }
}
