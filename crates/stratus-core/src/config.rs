use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use stratus_weather::fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use stratus_weather::retry::{DEFAULT_BASE_BACKOFF_SECS, DEFAULT_MAX_ATTEMPTS};
use stratus_weather::service::DEFAULT_BASE_URL;
use stratus_weather::{FetcherConfig, RetryPolicy, TemperatureUnit};

/// Environment variable that takes precedence over the stored API key
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const MASKED_KEY_PREFIX: usize = 8;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather API endpoint and credentials
    #[serde(default)]
    pub api: WeatherApiConfig,

    /// HTTP client behaviour
    #[serde(default)]
    pub http: HttpConfig,

    /// Response cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Activity log file
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Key taken from the environment; never written back to disk
    #[serde(skip)]
    pub api_key_override: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherApiConfig {
    /// Base URL of the WeatherAPI.com v1 API
    pub base_url: String,

    /// WeatherAPI.com key (can also be set via WEATHERAPI_KEY)
    pub api_key: String,
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-attempt request timeout
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Total attempts per request, including the first
    pub max_attempts: u32,

    /// Base of the linear backoff between attempts
    pub backoff_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_secs: DEFAULT_BASE_BACKOFF_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Entry lifetime in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// Activity log path
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: default_log_file(),
        }
    }
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stratus")
        .join("stratus.log")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub temperature_unit: TemperatureUnit,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating a default file if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
            config
        };

        config.apply_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Use `key` instead of the stored one when it is non-empty
    pub fn apply_key_override(&mut self, key: Option<String>) {
        self.api_key_override = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
    }

    /// Key sent with requests: environment first, then the file
    pub fn effective_api_key(&self) -> &str {
        self.api_key_override
            .as_deref()
            .unwrap_or(&self.api.api_key)
    }

    /// Replace the stored key; an explicit choice also drops the environment override
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api.api_key = key.into();
        self.api_key_override = None;
    }

    /// First characters of the key followed by an ellipsis
    pub fn masked_api_key(&self) -> String {
        let key = self.effective_api_key();
        if key.is_empty() {
            return "(not set)".to_string();
        }
        let prefix: String = key.chars().take(MASKED_KEY_PREFIX).collect();
        format!("{}...", prefix)
    }

    /// Settings for the HTTP fetcher
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            user_agent: self.http.user_agent.clone(),
            retry: RetryPolicy::new(
                self.http.max_attempts,
                Duration::from_secs(self.http.backoff_secs),
            ),
        }
    }

    /// Endpoint settings for the weather service
    pub fn api_config(&self) -> stratus_weather::ApiConfig {
        stratus_weather::ApiConfig::new(self.api.base_url.clone(), self.effective_api_key())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.base_url, "api.base_url", &mut result);

        if self.effective_api_key().trim().is_empty() {
            result.add_warning(
                "api.api_key",
                format!("No API key configured - set {} or api.api_key", API_KEY_ENV),
            );
        }

        if self.http.timeout_secs == 0 {
            result.add_error("http.timeout_secs", "Timeout must be greater than 0");
        } else if self.http.timeout_secs > 120 {
            result.add_warning("http.timeout_secs", "Timeout is unusually long (>120s)");
        }

        if self.http.user_agent.trim().is_empty() {
            result.add_error("http.user_agent", "User agent cannot be empty");
        }

        if self.http.max_attempts == 0 {
            result.add_warning("http.max_attempts", "0 attempts is treated as a single attempt");
        } else if self.http.max_attempts > 10 {
            result.add_warning("http.max_attempts", "More than 10 attempts per request");
        }

        if self.http.backoff_secs > 60 {
            result.add_warning("http.backoff_secs", "Backoff base is more than a minute");
        }

        if self.cache.enabled && self.cache.ttl_secs == 0 {
            result.add_warning(
                "cache.ttl_secs",
                "Cache enabled with a 0 second TTL - entries expire immediately",
            );
        }

        if self.logging.enabled && self.logging.file.as_os_str().is_empty() {
            result.add_error("logging.file", "Logging enabled but no log file set");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                } else if url.scheme() == "http" {
                    result.add_warning(field_name, "API key will be sent over plain http");
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("stratus");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Missing key is only a warning
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.iter().any(|w| w.field == "api.api_key"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.weatherapi.com/v1/");
        assert_eq!(config.http.timeout_secs, 15);
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.http.backoff_secs, 2);
        assert!(config.cache.enabled);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert!(config.logging.enabled);
        assert_eq!(config.display.temperature_unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.api.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "api.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.api.base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_plain_http_is_warning() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8080/v1/".to_string();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "api.base_url"));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "http.timeout_secs"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_key_override_takes_precedence() {
        let mut config = Config::default();
        config.api.api_key = "from-file".to_string();

        config.apply_key_override(Some("  from-env  ".to_string()));
        assert_eq!(config.effective_api_key(), "from-env");
        assert_eq!(config.api_config().api_key, "from-env");

        config.apply_key_override(Some(String::new()));
        assert_eq!(config.effective_api_key(), "from-file");

        config.apply_key_override(Some("from-env".to_string()));
        config.set_api_key("typed-in");
        assert_eq!(config.effective_api_key(), "typed-in");
    }

    #[test]
    fn test_masked_api_key() {
        let mut config = Config::default();
        assert_eq!(config.masked_api_key(), "(not set)");
        config.set_api_key("0123456789abcdef");
        assert_eq!(config.masked_api_key(), "01234567...");
    }

    #[test]
    fn test_fetcher_config_mapping() {
        let mut config = Config::default();
        config.http.timeout_secs = 5;
        config.http.max_attempts = 4;
        config.http.backoff_secs = 1;

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.timeout, Duration::from_secs(5));
        assert_eq!(fetcher.retry.max_attempts, 4);
        assert_eq!(fetcher.retry.base_backoff, Duration::from_secs(1));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.http.max_attempts, 3);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.api.api_key = "abc123".to_string();
        config.display.temperature_unit = TemperatureUnit::Fahrenheit;
        config.logging.enabled = false;
        config.save_to(&path).unwrap();

        let loaded: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.api.api_key, "abc123");
        assert_eq!(loaded.display.temperature_unit, TemperatureUnit::Fahrenheit);
        assert!(!loaded.logging.enabled);
    }

    #[test]
    fn test_env_override_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.apply_key_override(Some("secret-from-env".to_string()));
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("secret-from-env"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            api_key = "k"

            [display]
            temperature_unit = "fahrenheit"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.api_key, "k");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.timeout_secs, 15);
        assert_eq!(config.display.temperature_unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http\ntimeout_secs = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_validated_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 0\n").unwrap();

        let err = Config::load_validated(Some(&path)).unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(config_err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("http.timeout_secs"));
    }
}
