use crate::forecast::error::ForecastError;
use log::{debug, warn};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

/// Sends `request` and decodes a JSON body. `url` is only used for logs and errors and
/// must not contain credentials.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, ForecastError> {
    debug!("Requesting {}", url);
    let response = request
        .send()
        .await
        .map_err(|e| ForecastError::NetworkRequest(url.to_string(), e.without_url()))?;

    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            warn!("HTTP error for {}: {:?}", url, e.status());
            return Err(if let Some(status) = e.status() {
                ForecastError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e.without_url(),
                }
            } else {
                ForecastError::NetworkRequest(url.to_string(), e.without_url())
            });
        }
    };

    let body = response
        .bytes()
        .await
        .map_err(|e| ForecastError::NetworkRequest(url.to_string(), e.without_url()))?;
    serde_json::from_slice(&body).map_err(|source| ForecastError::JsonParse {
        url: url.to_string(),
        source,
    })
}
