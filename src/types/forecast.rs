//! Forecast output types shared by every forecast source.

use crate::types::coordinates::LatLon;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which upstream service produced a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastSource {
    /// The US National Weather Service API (`api.weather.gov`).
    Noaa,
    /// OpenWeatherMap's 5 day / 3 hour forecast.
    OpenWeatherMap,
}

impl fmt::Display for ForecastSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastSource::Noaa => write!(f, "noaa"),
            ForecastSource::OpenWeatherMap => write!(f, "openweathermap"),
        }
    }
}

/// A single forecast period.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub temperature: f64,
    /// Unit of `temperature` as reported by the source ("F" or "C").
    pub temperature_unit: String,
    /// Free text description of the period.
    pub detailed_forecast: String,
    pub start_time: DateTime<FixedOffset>,
}

/// Forecasts for an airport, gathered from every configured source.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportForecast {
    pub iata_code: String,
    pub coordinates: LatLon,
    pub noaa: Vec<ForecastPeriod>,
    /// `None` when no OpenWeatherMap client is configured.
    pub open_weather_map: Option<Vec<ForecastPeriod>>,
}
