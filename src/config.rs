//! Feed configuration
//!
//! Configuration is read from a YAML or JSON file, then overridden by
//! environment variables. Every section has defaults, so an empty file is a
//! valid configuration apart from the API key.

use crate::classify::ErrorMessages;
use crate::error::{Error, Result, ResultExt};
use crate::http::{ApiClientConfig, RateLimiterConfig, TcpProbe};
use crate::pagination::PaginationConfig;
use crate::scroll::ScrollTrigger;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable overriding `api.api_key`
pub const ENV_API_KEY: &str = "ENDLESS_FEED_API_KEY";
/// Environment variable overriding `api.base_url`
pub const ENV_BASE_URL: &str = "ENDLESS_FEED_BASE_URL";
/// Environment variable overriding `total_pages`
pub const ENV_TOTAL_PAGES: &str = "ENDLESS_FEED_TOTAL_PAGES";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Upper bound on how many pages will be requested
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    /// Remote API settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Connectivity probe settings
    #[serde(default)]
    pub connectivity: ConnectivitySettings,

    /// Near-end detection
    #[serde(default)]
    pub scroll: ScrollTrigger,

    /// User-facing failure messages
    #[serde(default)]
    pub messages: ErrorMessages,
}

fn default_total_pages() -> u32 {
    5
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            total_pages: default_total_pages(),
            api: ApiSettings::default(),
            connectivity: ConnectivitySettings::default(),
            scroll: ScrollTrigger::default(),
            messages: ErrorMessages::default(),
        }
    }
}

// ============================================================================
// API Settings
// ============================================================================

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL poster fragments are joined onto
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Response language
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Transport retries per page (pagination retries are always manual)
    #[serde(default)]
    pub max_retries: u32,

    /// Request rate limit
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w150".to_string()
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            requests_per_second: default_requests_per_second(),
        }
    }
}

// ============================================================================
// Connectivity Settings
// ============================================================================

/// Connectivity probe settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivitySettings {
    /// Address the probe connects to
    #[serde(default = "default_probe_addr")]
    pub probe_addr: String,

    /// Probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_probe_addr() -> String {
    "1.1.1.1:53".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            probe_addr: default_probe_addr(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl FeedConfig {
    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        parsed.with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Parse YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document means all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.api.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(pages) = lookup(ENV_TOTAL_PAGES) {
            self.total_pages = pages
                .trim()
                .parse()
                .map_err(|e| Error::invalid_value(ENV_TOTAL_PAGES, format!("{e}")))?;
        }
        Ok(())
    }

    /// Check values that have no sensible fallback
    pub fn validate(&self) -> Result<()> {
        if self.total_pages == 0 {
            return Err(Error::invalid_value(
                "total_pages",
                "must be at least 1",
            ));
        }
        Url::parse(&self.api.base_url)
            .map_err(|e| Error::invalid_value("api.base_url", e.to_string()))?;
        Url::parse(&self.api.image_base_url)
            .map_err(|e| Error::invalid_value("api.image_base_url", e.to_string()))?;
        if self.api.timeout_secs == 0 {
            return Err(Error::invalid_value("api.timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// Require an API key
    pub fn require_api_key(&self) -> Result<&str> {
        self.api
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::missing_field("api.api_key"))
    }

    // ========================================================================
    // Derived component configs
    // ========================================================================

    /// Pagination controller config
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig::new(self.total_pages).with_messages(self.messages.clone())
    }

    /// Movie API client config
    pub fn api_client(&self) -> ApiClientConfig {
        let mut builder = ApiClientConfig::builder()
            .base_url(&self.api.base_url)
            .language(&self.api.language)
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .max_retries(self.api.max_retries);
        if let Some(ref key) = self.api.api_key {
            builder = builder.api_key(key);
        }
        builder = if self.api.requests_per_second == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::new(
                self.api.requests_per_second,
                self.api.requests_per_second,
            ))
        };
        builder.build()
    }

    /// Connectivity probe
    pub fn probe(&self) -> TcpProbe {
        TcpProbe::new(
            &self.connectivity.probe_addr,
            Duration::from_millis(self.connectivity.timeout_ms),
        )
    }

    /// Copy safe to print: the API key is masked
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        if config.api.api_key.is_some() {
            config.api.api_key = Some("********".to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.total_pages, 5);
        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.api.language, "en_US");
        assert_eq!(config.scroll.prefetch_distance, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(FeedConfig::from_yaml_str("").unwrap(), FeedConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
total_pages: 3
api:
  api_key: abc
  language: de_DE
scroll:
  prefetch_distance: 4
messages:
  timeout: "Slow network"
"#;
        let config = FeedConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.total_pages, 3);
        assert_eq!(config.api.api_key.as_deref(), Some("abc"));
        assert_eq!(config.api.language, "de_DE");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.scroll.prefetch_distance, 4);
        assert_eq!(config.messages.timeout, "Slow network");
        assert_eq!(config.messages.unknown, ErrorMessages::default().unknown);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "total_pages: 7").unwrap();

        let config = FeedConfig::load(file.path()).unwrap();
        assert_eq!(config.total_pages, 7);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"total_pages": 2, "api": {{"api_key": "k"}}}}"#).unwrap();

        let config = FeedConfig::load(file.path()).unwrap();
        assert_eq!(config.total_pages, 2);
        assert_eq!(config.require_api_key().unwrap(), "k");
    }

    #[test]
    fn test_load_missing_file() {
        let err = FeedConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_load_bad_yaml_has_context() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "total_pages: [not a number").unwrap();

        let err = FeedConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_KEY, "from-env"),
            (ENV_BASE_URL, "http://localhost:9000"),
            (ENV_TOTAL_PAGES, " 9 "),
        ]
        .into_iter()
        .collect();

        let mut config = FeedConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.api.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.total_pages, 9);
    }

    #[test]
    fn test_env_bad_total_pages() {
        let mut config = FeedConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_TOTAL_PAGES).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_validate() {
        let mut config = FeedConfig::default();
        config.total_pages = 0;
        assert!(config.validate().is_err());

        let mut config = FeedConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = FeedConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require_api_key() {
        let mut config = FeedConfig::default();
        assert!(matches!(
            config.require_api_key().unwrap_err(),
            Error::MissingConfigField { .. }
        ));
        config.api.api_key = Some(String::new());
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_derived_configs() {
        let mut config = FeedConfig::default();
        config.total_pages = 3;
        config.api.api_key = Some("k".to_string());
        config.api.requests_per_second = 0;

        assert_eq!(config.pagination().total_pages, 3);

        let client = config.api_client();
        assert_eq!(client.api_key.as_deref(), Some("k"));
        assert!(client.rate_limit.is_none());
        assert_eq!(client.timeout, Duration::from_secs(30));

        assert_eq!(config.probe().addr(), "1.1.1.1:53");
    }

    #[test]
    fn test_masked() {
        let mut config = FeedConfig::default();
        config.api.api_key = Some("secret".to_string());
        let masked = config.masked();
        assert_eq!(masked.api.api_key.as_deref(), Some("********"));
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
    }
}
