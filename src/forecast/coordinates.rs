//! Airport coordinate lookup through the aviationstack airports API.

use crate::config::ApiConfig;
use crate::forecast::error::ForecastError;
use crate::forecast::http::get_json;
use crate::types::coordinates::LatLon;
use log::info;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "aviationstack";

#[derive(Debug, Deserialize)]
struct AirportsResponse {
    #[serde(default)]
    data: Vec<AirportRecord>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct AirportRecord {
    iata_code: Option<String>,
    latitude: Option<CoordinateValue>,
    longitude: Option<CoordinateValue>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: serde_json::Value,
    #[serde(default)]
    message: String,
}

// The API has returned coordinates both as strings and as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoordinateValue {
    Number(f64),
    Text(String),
}

/// Resolves IATA codes to airport coordinates.
pub struct AviationstackClient {
    config: ApiConfig,
    api_key: String,
    http: Client,
}

impl AviationstackClient {
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

    /// Looks up the coordinates of the airport with the given IATA code.
    ///
    /// # Errors
    ///
    /// * [`ForecastError::AirportNotFound`] if the service knows no such airport.
    /// * [`ForecastError::Api`] if the service reports an error (e.g. an invalid key).
    /// * [`ForecastError::InvalidCoordinate`] if the record has no usable coordinates.
    /// * Network, status and parse errors as for every request.
    pub async fn resolve_coordinates(&self, iata_code: &str) -> Result<LatLon, ForecastError> {
        let code = iata_code.trim().to_uppercase();
        let url = self.config.endpoint("airports");
        let request = self.http.get(&url).query(&[
            ("access_key", self.api_key.as_str()),
            ("iata_code", code.as_str()),
        ]);
        let response: AirportsResponse = get_json(request, &url).await?;

        if let Some(error) = response.error {
            let code = match error.code {
                serde_json::Value::String(code) => code,
                other => other.to_string(),
            };
            return Err(ForecastError::Api {
                url,
                code,
                message: error.message,
            });
        }

        // Prefer the record that really carries the requested code.
        let position = response
            .data
            .iter()
            .position(|airport| {
                airport
                    .iata_code
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(&code))
            })
            .unwrap_or(0);
        let airport = response
            .data
            .into_iter()
            .nth(position)
            .ok_or_else(|| ForecastError::AirportNotFound(code.clone()))?;

        let latitude = parse_coordinate(&code, "latitude", airport.latitude)?;
        let longitude = parse_coordinate(&code, "longitude", airport.longitude)?;
        info!("Resolved {} to {:.4},{:.4}", code, latitude, longitude);
        Ok(LatLon(latitude, longitude))
    }
}

fn parse_coordinate(
    iata_code: &str,
    field: &'static str,
    value: Option<CoordinateValue>,
) -> Result<f64, ForecastError> {
    let invalid = |value: String| ForecastError::InvalidCoordinate {
        iata_code: iata_code.to_string(),
        field,
        value,
    };
    match value {
        Some(CoordinateValue::Number(number)) => Ok(number),
        Some(CoordinateValue::Text(text)) => text.trim().parse::<f64>().map_err(|_| invalid(text)),
        None => Err(invalid("missing".to_string())),
    }
}
