//! WeatherAPI.com endpoints composed over the [`Fetcher`].

use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::encode::encode_query;
use crate::error::FetchResult;
use crate::fetcher::Fetcher;
use crate::types::{CurrentResponse, ForecastResponse, IpLookup};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1/";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
const HOURLY_FORECAST_DAYS: u8 = 2;

/// Endpoint settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Weather queries for one API key.
#[derive(Debug, Clone)]
pub struct WeatherService {
    fetcher: Fetcher,
    api: ApiConfig,
    use_cache: bool,
    max_attempts: u32,
}

impl WeatherService {
    pub fn new(fetcher: Fetcher, api: ApiConfig) -> Self {
        let max_attempts = fetcher.retry_policy().max_attempts;
        Self {
            fetcher,
            api,
            use_cache: true,
            max_attempts,
        }
    }

    /// Skip the response cache for both reads and writes
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    /// Shared cache handle (settings, diagnostics)
    pub fn cache(&self) -> &Arc<ResponseCache> {
        self.fetcher.cache()
    }

    /// Invalidate every cached response
    pub fn clear_cache(&self) {
        self.fetcher.cache().clear();
    }

    /// Build `{base}{endpoint}.json?key=..&q=..` followed by `extra` params.
    pub fn endpoint_url(&self, endpoint: &str, query: &str, extra: &[(&str, String)]) -> String {
        let base = self.api.base_url.trim_end_matches('/');
        let mut url = format!(
            "{}/{}.json?key={}&q={}",
            base,
            endpoint,
            encode_query(&self.api.api_key),
            encode_query(query)
        );
        for (name, value) in extra {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&encode_query(value));
        }
        url
    }

    /// Current conditions with air quality.
    pub async fn current(&self, location: &str) -> FetchResult<CurrentResponse> {
        let url = self.endpoint_url("current", location, &[("aqi", "yes".into())]);
        self.fetcher.fetch(&url, self.use_cache, self.max_attempts).await
    }

    /// Multi-day forecast with air quality and alerts.
    pub async fn forecast(&self, location: &str, days: u8) -> FetchResult<ForecastResponse> {
        let url = self.endpoint_url(
            "forecast",
            location,
            &[
                ("days", days.to_string()),
                ("aqi", "yes".into()),
                ("alerts", "yes".into()),
            ],
        );
        self.fetcher.fetch(&url, self.use_cache, self.max_attempts).await
    }

    /// Two days of hourly entries.
    pub async fn hourly(&self, location: &str) -> FetchResult<ForecastResponse> {
        self.forecast(location, HOURLY_FORECAST_DAYS).await
    }

    /// Same request as [`current`](Self::current), so the two share a cache entry.
    pub async fn air_quality(&self, location: &str) -> FetchResult<CurrentResponse> {
        self.current(location).await
    }

    pub async fn alerts(&self, location: &str) -> FetchResult<ForecastResponse> {
        let url = self.endpoint_url("forecast", location, &[("alerts", "yes".into())]);
        self.fetcher.fetch(&url, self.use_cache, self.max_attempts).await
    }

    /// Geolocate an IP address; `auto` resolves the caller's address.
    pub async fn ip_lookup(&self, ip: &str) -> FetchResult<IpLookup> {
        let url = self.endpoint_url("ip", ip, &[]);
        self.fetcher.fetch(&url, self.use_cache, self.max_attempts).await
    }
}
