//! Client for the NOAA NCEI access data service (`global-hourly` dataset).

use crate::config::ApiConfig;
use crate::types::month::Month;
use crate::types::observation::WeatherObservation;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::raw_record::parse_observations;
use crate::weather_data::source::ObservationSource;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::Client;

const DATASET: &str = "global-hourly";

/// Fetches historical hourly observations for a station over a date span.
///
/// One request is issued per call; pagination over longer windows is the job of the
/// acquisition loop (see [`crate::fetch_historical`]).
pub struct NceiClient {
    config: ApiConfig,
    http: Client,
}

impl NceiClient {
    /// Creates a client for the service described by `config`. `config.base_url` is the
    /// full data endpoint (see [`ApiConfig::ncei`]).
    pub fn new(config: ApiConfig) -> Result<Self, WeatherDataError> {
        let http = config.http_client().map_err(WeatherDataError::HttpClient)?;
        Ok(Self { config, http })
    }

    /// Fetches all observations of `station` from `start` through `end` (inclusive).
    ///
    /// # Errors
    ///
    /// * [`WeatherDataError::NetworkRequest`] on connection failures and timeouts.
    /// * [`WeatherDataError::HttpStatus`] on a non-success response.
    /// * [`WeatherDataError::JsonParse`] / [`WeatherDataError::InvalidMeasurement`] on a
    ///   body that cannot be decoded.
    pub async fn observations(
        &self,
        station: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeatherObservation>, WeatherDataError> {
        let url = self.config.base_url.clone();
        let start_date = start.format("%Y-%m-%d").to_string();
        let end_date = end.format("%Y-%m-%d").to_string();
        debug!(
            "Requesting {} for station {} ({} to {})",
            url, station, start_date, end_date
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("dataset", DATASET),
                ("stations", station),
                ("startDate", start_date.as_str()),
                ("endDate", end_date.as_str()),
                ("format", "json"),
                ("units", "metric"),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;
        let observations = parse_observations(&body, &url)?;
        debug!(
            "Received {} observations for station {} ({} to {})",
            observations.len(),
            station,
            start_date,
            end_date
        );
        Ok(observations)
    }
}

impl ObservationSource for NceiClient {
    async fn fetch_month(
        &self,
        station: &str,
        month: Month,
    ) -> Result<Vec<WeatherObservation>, WeatherDataError> {
        self.observations(station, month.first_day(), month.last_day())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DATA_PATH: &str = "/access/services/data/v1";

    fn client_for(server: &MockServer) -> NceiClient {
        let config = ApiConfig::ncei()
            .with_base_url(format!("{}{}", server.uri(), DATA_PATH))
            .with_user_agent("airport-weather-tests (test@example.com)");
        NceiClient::new(config).expect("Failed to build client")
    }

    #[tokio::test]
    async fn test_fetch_month_sends_expected_request() -> Result<(), WeatherDataError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATA_PATH))
            .and(query_param("dataset", "global-hourly"))
            .and(query_param("stations", "USW00094789"))
            .and(query_param("startDate", "2024-02-01"))
            .and(query_param("endDate", "2024-02-29"))
            .and(query_param("format", "json"))
            .and(query_param("units", "metric"))
            .and(header("accept", "application/json"))
            .and(header("user-agent", "airport-weather-tests (test@example.com)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"STATION": "USW00094789", "DATE": "2024-02-01T00:51:00", "TMP": "2.8", "WDSP": "5.1"},
                {"STATION": "USW00094789", "DATE": "2024-02-01T01:51:00", "PRCP": "0.5", "NAME": "JFK"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let observations = client
            .fetch_month("USW00094789", Month::new(2024, 2).unwrap())
            .await?;

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].date, "2024-02-01T00:51:00");
        assert_eq!(observations[0].temperature, Some(2.8));
        assert_eq!(observations[0].wind_speed, Some(5.1));
        assert_eq!(observations[0].precipitation, None);
        assert_eq!(observations[1].temperature, None);
        assert_eq!(observations[1].precipitation, Some(0.5));
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATA_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_month("USW00094789", Month::new(2024, 1).unwrap())
            .await;

        match result {
            Err(WeatherDataError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 503),
            other => panic!("Expected HttpStatus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATA_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .fetch_month("USW00094789", Month::new(2024, 1).unwrap())
            .await;

        assert!(matches!(result, Err(WeatherDataError::JsonParse { .. })));
    }

    #[tokio::test]
    async fn test_empty_month() -> Result<(), WeatherDataError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DATA_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let observations = client_for(&server)
            .fetch_month("USW00094789", Month::new(2024, 1).unwrap())
            .await?;
        assert!(observations.is_empty());
        Ok(())
    }
}
