//! Connection settings for the upstream weather and airport APIs.

use bon::Builder;
use std::time::Duration;

pub const NCEI_BASE_URL: &str = "https://www.ncei.noaa.gov/access/services/data/v1";
pub const NWS_BASE_URL: &str = "https://api.weather.gov";
pub const AVIATIONSTACK_BASE_URL: &str = "http://api.aviationstack.com/v1";
pub const OPEN_WEATHER_MAP_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// User agent sent when none is configured. `api.weather.gov` rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("airport_weather/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one upstream API client.
///
/// Every client in this crate is constructed from an `ApiConfig`, so credentials and
/// endpoints are never compiled in. Use one of the presets for the public endpoints, or
/// the builder to point a client somewhere else.
///
/// # Examples
///
/// ```
/// use airport_weather::ApiConfig;
/// use std::time::Duration;
///
/// let noaa = ApiConfig::nws().with_user_agent("my-app (ops@example.com)");
/// assert_eq!(noaa.base_url, "https://api.weather.gov");
///
/// let custom = ApiConfig::builder()
///     .base_url("http://localhost:8080")
///     .api_key("secret")
///     .timeout(Duration::from_secs(5))
///     .build();
/// assert_eq!(custom.api_key.as_deref(), Some("secret"));
/// assert_eq!(custom.user_agent, airport_weather::DEFAULT_USER_AGENT);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ApiConfig {
    /// Base URL of the service, without a trailing slash.
    #[builder(into)]
    pub base_url: String,
    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
    /// Access key for services that require one.
    #[builder(into)]
    pub api_key: Option<String>,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl ApiConfig {
    /// NOAA NCEI access data service (historical observations).
    pub fn ncei() -> Self {
        Self::builder().base_url(NCEI_BASE_URL).build()
    }

    /// NOAA National Weather Service API (forecasts).
    pub fn nws() -> Self {
        Self::builder().base_url(NWS_BASE_URL).build()
    }

    /// Aviationstack airports API (coordinates).
    pub fn aviationstack(api_key: impl Into<String>) -> Self {
        Self::builder()
            .base_url(AVIATIONSTACK_BASE_URL)
            .api_key(api_key)
            .build()
    }

    /// OpenWeatherMap forecast API.
    pub fn open_weather_map(api_key: impl Into<String>) -> Self {
        Self::builder()
            .base_url(OPEN_WEATHER_MAP_BASE_URL)
            .api_key(api_key)
            .build()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Joins `path` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Builds the pooled HTTP client shared by all requests of one API client.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let ncei = ApiConfig::ncei();
        assert_eq!(ncei.base_url, NCEI_BASE_URL);
        assert_eq!(ncei.timeout, Duration::from_secs(30));
        assert!(ncei.api_key.is_none());

        let owm = ApiConfig::open_weather_map("abc");
        assert_eq!(owm.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_endpoint_joins_single_slash() {
        let config = ApiConfig::nws().with_base_url("http://localhost:1234/");
        assert_eq!(config.endpoint("/points/1,2"), "http://localhost:1234/points/1,2");
        assert_eq!(config.endpoint("points"), "http://localhost:1234/points");
    }
}
