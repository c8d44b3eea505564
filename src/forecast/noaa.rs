//! NOAA forecasts from the National Weather Service API (`api.weather.gov`).
//!
//! A forecast takes two requests: `/points/{lat},{lon}` maps the coordinate onto the
//! forecast office grid, then `/gridpoints/{office}/{x},{y}/forecast` returns the periods.

use crate::config::ApiConfig;
use crate::forecast::error::ForecastError;
use crate::forecast::fetcher::ForecastFetcher;
use crate::forecast::http::get_json;
use crate::types::coordinates::LatLon;
use crate::types::forecast::{ForecastPeriod, ForecastSource};
use chrono::{DateTime, FixedOffset};
use log::info;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;

const GEO_JSON: &str = "application/geo+json";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    grid_id: String,
    grid_x: i64,
    grid_y: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<NwsPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NwsPeriod {
    temperature: f64,
    temperature_unit: String,
    #[serde(default)]
    detailed_forecast: String,
    start_time: DateTime<FixedOffset>,
}

impl From<NwsPeriod> for ForecastPeriod {
    fn from(period: NwsPeriod) -> Self {
        ForecastPeriod {
            temperature: period.temperature,
            temperature_unit: period.temperature_unit,
            detailed_forecast: period.detailed_forecast,
            start_time: period.start_time,
        }
    }
}

/// The forecast office grid cell covering a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPoint {
    pub office: String,
    pub x: i64,
    pub y: i64,
}

/// Client for the NWS forecast API. No key is needed, but the API requires a
/// descriptive `User-Agent`, taken from the config.
pub struct NwsClient {
    config: ApiConfig,
    http: Client,
}

impl NwsClient {
    pub fn new(config: ApiConfig) -> Result<Self, ForecastError> {
        let http = config.http_client().map_err(ForecastError::HttpClient)?;
        Ok(Self { config, http })
    }

    /// Finds the forecast grid cell for `location`.
    pub async fn grid_point(&self, location: LatLon) -> Result<GridPoint, ForecastError> {
        // The API redirects coordinates with more than four decimals.
        let url = self.config.endpoint(&format!("points/{}", location));
        let request = self.http.get(&url).header(ACCEPT, GEO_JSON);
        let points: PointsResponse = get_json(request, &url).await?;
        Ok(GridPoint {
            office: points.properties.grid_id,
            x: points.properties.grid_x,
            y: points.properties.grid_y,
        })
    }

    /// Fetches the forecast periods of a grid cell.
    pub async fn grid_forecast(&self, grid: &GridPoint) -> Result<Vec<ForecastPeriod>, ForecastError> {
        let url = self.config.endpoint(&format!(
            "gridpoints/{}/{},{}/forecast",
            grid.office, grid.x, grid.y
        ));
        let request = self.http.get(&url).header(ACCEPT, GEO_JSON);
        let forecast: ForecastResponse = get_json(request, &url).await?;
        Ok(forecast
            .properties
            .periods
            .into_iter()
            .map(ForecastPeriod::from)
            .collect())
    }
}

impl ForecastFetcher for NwsClient {
    fn source(&self) -> ForecastSource {
        ForecastSource::Noaa
    }

    async fn fetch_forecast(&self, location: LatLon) -> Result<Vec<ForecastPeriod>, ForecastError> {
        let grid = self.grid_point(location).await?;
        let periods = self.grid_forecast(&grid).await?;
        info!(
            "NOAA returned {} forecast periods for {} (grid {}/{},{})",
            periods.len(),
            location,
            grid.office,
            grid.x,
            grid.y
        );
        Ok(periods)
    }
}
