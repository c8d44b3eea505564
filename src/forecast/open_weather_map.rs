//! OpenWeatherMap 5 day / 3 hour forecast.

use crate::config::ApiConfig;
use crate::forecast::error::ForecastError;
use crate::forecast::fetcher::ForecastFetcher;
use crate::forecast::http::get_json;
use crate::types::coordinates::LatLon;
use crate::types::forecast::{ForecastPeriod, ForecastSource};
use chrono::DateTime;
use log::info;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "openweathermap";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

/// Client for the OpenWeatherMap forecast API. Requests metric units, so temperatures
/// are reported in °C.
pub struct OpenWeatherMapClient {
    config: ApiConfig,
    api_key: String,
    http: Client,
}

impl OpenWeatherMapClient {
    /// # Errors
    ///
    /// [`ForecastError::MissingApiKey`] if `config.api_key` is not set.
    pub fn new(config: ApiConfig) -> Result<Self, ForecastError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ForecastError::MissingApiKey(SERVICE))?;
        let http = config.http_client().map_err(ForecastError::HttpClient)?;
        Ok(Self {
            config,
            api_key,
            http,
        })
    }
}

impl ForecastFetcher for OpenWeatherMapClient {
    fn source(&self) -> ForecastSource {
        ForecastSource::OpenWeatherMap
    }

    async fn fetch_forecast(&self, location: LatLon) -> Result<Vec<ForecastPeriod>, ForecastError> {
        let url = self.config.endpoint("forecast");
        let latitude = location.latitude().to_string();
        let longitude = location.longitude().to_string();
        let request = self.http.get(&url).query(&[
            ("lat", latitude.as_str()),
            ("lon", longitude.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]);
        let response: ForecastResponse = get_json(request, &url).await?;

        let periods = response
            .list
            .into_iter()
            .map(|entry| {
                let start_time = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
                    ForecastError::InvalidTimestamp {
                        url: url.clone(),
                        timestamp: entry.dt,
                    }
                })?;
                Ok(ForecastPeriod {
                    temperature: entry.main.temp,
                    temperature_unit: "C".to_string(),
                    detailed_forecast: entry
                        .weather
                        .into_iter()
                        .next()
                        .map(|condition| condition.description)
                        .unwrap_or_default(),
                    start_time: start_time.fixed_offset(),
                })
            })
            .collect::<Result<Vec<_>, ForecastError>>()?;

        info!(
            "OpenWeatherMap returned {} forecast periods for {}",
            periods.len(),
            location
        );
        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_forecast_maps_entries() -> Result<(), ForecastError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("lat", "40.642334"))
            .and(query_param("lon", "-73.78817"))
            .and(query_param("appid", "owm-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "list": [
                    {
                        "dt": 1704132000,
                        "main": {"temp": 2.5, "humidity": 60},
                        "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
                        "dt_txt": "2024-01-01 18:00:00"
                    },
                    {
                        "dt": 1704142800,
                        "main": {"temp": 1.0},
                        "weather": []
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ApiConfig::open_weather_map("owm-key").with_base_url(server.uri());
        let client = OpenWeatherMapClient::new(config).expect("Failed to build client");
        let periods = client.fetch_forecast(LatLon(40.642334, -73.78817)).await?;

        assert_eq!(client.source(), ForecastSource::OpenWeatherMap);
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].temperature, 2.5);
        assert_eq!(periods[0].temperature_unit, "C");
        assert_eq!(periods[0].detailed_forecast, "clear sky");
        assert_eq!(periods[0].start_time.to_rfc3339(), "2024-01-01T18:00:00+00:00");
        assert_eq!(periods[1].detailed_forecast, "");
        Ok(())
    }

    #[test]
    fn test_requires_api_key() {
        let config = ApiConfig::builder()
            .base_url("http://localhost")
            .build();
        assert!(matches!(
            OpenWeatherMapClient::new(config),
            Err(ForecastError::MissingApiKey("openweathermap"))
        ));
    }
}
