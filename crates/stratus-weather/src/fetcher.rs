//! HTTP fetcher: cache lookup, GET with retry, decode and classify.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::error::{FetchError, FetchResult};
use crate::observer::{redact_key, FetchEvent, FetchObserver};
use crate::retry::{describe_transport_error, RetryPolicy};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = concat!("stratus/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// Client settings injected by the configuration layer
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Value of the User-Agent header
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Issues GET requests backed by a shared [`ResponseCache`].
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    cache: Arc<ResponseCache>,
    retry: RetryPolicy,
    observer: Option<Arc<dyn FetchObserver>>,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("retry", &self.retry)
            .field("cached_entries", &self.cache.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Fetcher {
    /// Build a fetcher. Certificate and hostname verification stay on.
    pub fn new(config: FetcherConfig, cache: Arc<ResponseCache>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            cache,
            retry: config.retry,
            observer: None,
        })
    }

    /// Attach an optional sink for fetch events
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn emit(&self, event: FetchEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }

    /// Fetch `url` and decode it as `T`.
    ///
    /// With `use_cache`, a fresh cached response is returned without any
    /// network I/O and a successful response is stored under the exact URL.
    /// Transport failures are retried up to `max_attempts` total attempts;
    /// anything that produced a response is decoded and classified as-is.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        use_cache: bool,
        max_attempts: u32,
    ) -> FetchResult<T> {
        let shown = redact_key(url);

        if use_cache {
            if let Some(value) = self.cache.get(url) {
                tracing::debug!("Using cached data for: {}", shown);
                self.emit(FetchEvent::CacheHit { url: shown.clone() });
                return serde_json::from_value(value).map_err(|e| {
                    self.fail(&shown, FetchError::Parse(format!("cached payload: {}", e)))
                });
            }
        }

        let max_attempts = max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.send(url).await {
                Ok(body) => {
                    let result = self.decode(url, &body, use_cache);
                    return match result {
                        Ok(payload) => {
                            if attempt > 1 {
                                tracing::info!("Request succeeded after {} attempts", attempt);
                            }
                            self.emit(FetchEvent::Succeeded {
                                url: shown,
                                attempts: attempt,
                                cached: use_cache,
                            });
                            Ok(payload)
                        }
                        Err(e) => Err(self.fail(&shown, e)),
                    };
                }
                Err(e) => {
                    last_error = describe_transport_error(&e);
                    tracing::warn!(
                        "Request attempt {} of {} failed: {}",
                        attempt,
                        max_attempts,
                        last_error
                    );
                    self.emit(FetchEvent::AttemptFailed {
                        url: shown.clone(),
                        attempt,
                        max_attempts,
                        error: last_error.clone(),
                    });
                }
            }

            if attempt < max_attempts {
                let delay = self.retry.delay_for_attempt(attempt);
                tracing::debug!("Waiting {:?} before retrying {}", delay, shown);
                self.emit(FetchEvent::Backoff { attempt, delay });
                tokio::time::sleep(delay).await;
            }
        }

        Err(self.fail(&shown, FetchError::Network(last_error)))
    }

    /// One transport-level exchange. Any HTTP status counts as a response.
    async fn send(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Weather API returned status {}", status);
        }
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    fn decode<T: DeserializeOwned>(&self, url: &str, body: &[u8], use_cache: bool) -> FetchResult<T> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;

        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(FetchError::Api(message));
        }

        let payload = T::deserialize(&value).map_err(|e| FetchError::Parse(e.to_string()))?;

        if use_cache {
            self.cache.put(url, value);
        }

        Ok(payload)
    }

    fn fail(&self, shown: &str, error: FetchError) -> FetchError {
        tracing::error!("Fetch of {} failed ({}): {}", shown, error.kind(), error.detail());
        self.emit(FetchEvent::Failed {
            url: shown.to_string(),
            kind: error.kind(),
            detail: error.detail().to_string(),
        });
        error
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    fn fetcher() -> Fetcher {
        Fetcher::new(FetcherConfig::default(), Arc::new(ResponseCache::default())).unwrap()
    }

    #[test]
    fn test_decode_success_caches() {
        let f = fetcher();
        let sample: Sample = f.decode("u", br#"{"name":"London"}"#, true).unwrap();
        assert_eq!(sample.name, "London");
        assert!(f.cache().contains_key("u"));
    }

    #[test]
    fn test_decode_without_cache_flag_does_not_store() {
        let f = fetcher();
        let _: Sample = f.decode("u", br#"{"name":"London"}"#, false).unwrap();
        assert!(f.cache().is_empty());
    }

    #[test]
    fn test_decode_api_error() {
        let f = fetcher();
        let result: FetchResult<Sample> = f.decode(
            "u",
            br#"{"error":{"code":1006,"message":"No matching location found."}}"#,
            true,
        );
        assert_eq!(result, Err(FetchError::Api("No matching location found.".into())));
        assert!(f.cache().is_empty());
    }

    #[test]
    fn test_decode_api_error_without_message() {
        let f = fetcher();
        let result: FetchResult<Sample> = f.decode("u", br#"{"error":"boom"}"#, true);
        assert_eq!(result, Err(FetchError::Api("\"boom\"".into())));
    }

    #[test]
    fn test_decode_malformed_body() {
        let f = fetcher();
        let result: FetchResult<Sample> = f.decode("u", b"<html>oops</html>", true);
        assert!(matches!(result, Err(FetchError::Parse(_))));
        assert!(f.cache().is_empty());
    }

    #[test]
    fn test_decode_schema_mismatch() {
        let f = fetcher();
        let result: FetchResult<Sample> = f.decode("u", br#"{"city":"London"}"#, true);
        assert!(matches!(result, Err(FetchError::Parse(msg)) if msg.contains("name")));
        assert!(f.cache().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.user_agent.starts_with("stratus/"));
        assert_eq!(config.retry, RetryPolicy::default());
    }
}
