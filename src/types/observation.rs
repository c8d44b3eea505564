use serde::{Deserialize, Serialize};

/// One normalized historical observation, as returned by the acquisition loop.
///
/// Measurements the data source did not report are `None`, never zero.
/// Values are metric: temperature in °C, wind speed in m/s, precipitation in mm.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    /// Station identifier exactly as reported by the data source.
    pub station: String,
    /// ISO-8601 observation timestamp, copied verbatim.
    pub date: String,
    pub temperature: Option<f64>,    // TMP
    pub wind_speed: Option<f64>,     // WDSP
    pub precipitation: Option<f64>,  // PRCP
}
