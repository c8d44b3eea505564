//! Decoding of the raw observation records returned by the historical data service.

use crate::types::observation::WeatherObservation;
use crate::weather_data::error::WeatherDataError;
use serde::Deserialize;

/// One record as delivered by the service. Fields other than these are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawObservation {
    #[serde(rename = "STATION")]
    station: String,
    #[serde(rename = "DATE")]
    date: String,
    #[serde(rename = "TMP", default)]
    temperature: Option<Measurement>,
    #[serde(rename = "WDSP", default)]
    wind_speed: Option<Measurement>,
    #[serde(rename = "PRCP", default)]
    precipitation: Option<Measurement>,
}

/// Measurements arrive as JSON numbers or as strings, the latter sometimes in the
/// `value,quality` form (e.g. `"+0123,1"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Measurement {
    Number(f64),
    Text(String),
}

impl RawObservation {
    pub(crate) fn into_observation(self) -> Result<WeatherObservation, WeatherDataError> {
        let temperature = parse_measurement("TMP", &self.date, self.temperature)?;
        let wind_speed = parse_measurement("WDSP", &self.date, self.wind_speed)?;
        let precipitation = parse_measurement("PRCP", &self.date, self.precipitation)?;
        Ok(WeatherObservation {
            station: self.station,
            date: self.date,
            temperature,
            wind_speed,
            precipitation,
        })
    }
}

fn parse_measurement(
    field: &'static str,
    date: &str,
    measurement: Option<Measurement>,
) -> Result<Option<f64>, WeatherDataError> {
    match measurement {
        None => Ok(None),
        Some(Measurement::Number(value)) => Ok(Some(value)),
        Some(Measurement::Text(text)) => {
            let value = text.split(',').next().unwrap_or_default().trim();
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| WeatherDataError::InvalidMeasurement {
                    field,
                    date: date.to_string(),
                    value: text.clone(),
                })
        }
    }
}

/// Parses a response body (a JSON array of records) into normalized observations,
/// preserving the order of the records.
pub(crate) fn parse_observations(
    body: &[u8],
    url: &str,
) -> Result<Vec<WeatherObservation>, WeatherDataError> {
    let raw: Vec<RawObservation> =
        serde_json::from_slice(body).map_err(|source| WeatherDataError::JsonParse {
            url: url.to_string(),
            source,
        })?;
    raw.into_iter().map(RawObservation::into_observation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost/data";

    #[test]
    fn test_string_temperature_maps_and_missing_fields_stay_absent() {
        let body = br#"[{"STATION":"X","DATE":"2024-01-01","TMP":"12.5"}]"#;
        let observations = parse_observations(body, URL).unwrap();

        assert_eq!(
            observations,
            vec![WeatherObservation {
                station: "X".to_string(),
                date: "2024-01-01".to_string(),
                temperature: Some(12.5),
                wind_speed: None,
                precipitation: None,
            }]
        );
    }

    #[test]
    fn test_numbers_nulls_and_quality_suffix() {
        let body = br#"[
            {"STATION":"72503014732","DATE":"2024-01-01T00:51:00","TMP":"+0123,1","WDSP":4.6,"PRCP":null,"REPORT_TYPE":"FM-15"},
            {"STATION":"72503014732","DATE":"2024-01-01T01:51:00","TMP":"-5.0","WDSP":"0","PRCP":"0.3"}
        ]"#;
        let observations = parse_observations(body, URL).unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].temperature, Some(123.0));
        assert_eq!(observations[0].wind_speed, Some(4.6));
        assert_eq!(observations[0].precipitation, None);
        assert_eq!(observations[1].date, "2024-01-01T01:51:00");
        assert_eq!(observations[1].temperature, Some(-5.0));
        assert_eq!(observations[1].wind_speed, Some(0.0));
        assert_eq!(observations[1].precipitation, Some(0.3));
    }

    #[test]
    fn test_empty_string_is_absent_not_zero() {
        let body = br#"[{"STATION":"X","DATE":"2024-01-01","TMP":"","WDSP":" "}]"#;
        let observations = parse_observations(body, URL).unwrap();
        assert_eq!(observations[0].temperature, None);
        assert_eq!(observations[0].wind_speed, None);
    }

    #[test]
    fn test_unreadable_measurement_is_an_error() {
        let body = br#"[{"STATION":"X","DATE":"2024-01-01","PRCP":"trace"}]"#;
        match parse_observations(body, URL) {
            Err(WeatherDataError::InvalidMeasurement { field, value, .. }) => {
                assert_eq!(field, "PRCP");
                assert_eq!(value, "trace");
            }
            other => panic!("Expected InvalidMeasurement, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_observations(br#"{"error":"bad"}"#, URL),
            Err(WeatherDataError::JsonParse { .. })
        ));
        // Station is required.
        assert!(matches!(
            parse_observations(br#"[{"DATE":"2024-01-01"}]"#, URL),
            Err(WeatherDataError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_observations(b"[]", URL).unwrap().is_empty());
    }
}
