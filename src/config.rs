//! Configuration management for the media upload SDK.
//!
//! Configuration is an explicit value handed to the client at construction;
//! nothing is read from process-wide state unless [`Config::from_env`] is
//! called.
//!
//! ## Usage
//!
//! ```rust
//! use tweet_media_rs::config::{Config, HttpConfig, UploadConfig};
//! use tweet_media_rs::Result;
//!
//! fn example() -> Result<()> {
//!     let config = Config::builder()
//!         .http(HttpConfig::builder()
//!             .request_timeout_secs(120)
//!             .build())
//!         .upload(UploadConfig::builder()
//!             .chunk_size(2 * 1024 * 1024)
//!             .max_status_checks(20)
//!             .build())
//!         .build();
//!     config.validate()?;
//!
//!     // Or load overrides from environment variables
//!     let config = Config::from_env()?;
//!     Ok(())
//! }
//! ```

use crate::error::{MediaError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default chunked-upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";

/// Default status-update endpoint.
pub const DEFAULT_STATUS_URL: &str = "https://api.twitter.com/1.1/statuses/update.json";

/// Largest chunk the upload endpoint accepts for a single APPEND.
pub const MAX_CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Main configuration structure for the SDK.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Chunking and processing-status polling configuration
    pub upload: UploadConfig,
}

/// HTTP client configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 60)
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,
    /// Chunked media upload endpoint
    pub upload_url: String,
    /// Status update endpoint
    pub status_url: String,
    /// User agent string for requests
    pub user_agent: String,
}

/// Upload protocol settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Bytes per APPEND segment (default: 1 MiB)
    pub chunk_size: usize,
    /// Maximum STATUS requests before giving up on processing (default: 60)
    pub max_status_checks: u32,
    /// Wait used when the server omits `check_after_secs` (default: 5)
    pub default_check_after_secs: u64,
    /// Upper bound on a single server-suggested wait (default: 300)
    pub max_check_after_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            status_url: DEFAULT_STATUS_URL.to_string(),
            user_agent: format!("tweet-media-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024 * 1024,
            max_status_checks: 60,
            default_check_after_secs: 5,
            max_check_after_secs: 300,
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TWEET_MEDIA_UPLOAD_URL") {
            config.http.upload_url = val;
        }

        if let Ok(val) = std::env::var("TWEET_MEDIA_STATUS_URL") {
            config.http.status_url = val;
        }

        if let Ok(val) = std::env::var("TWEET_MEDIA_REQUEST_TIMEOUT") {
            config.http.request_timeout_secs = val.parse().map_err(|_| {
                MediaError::config_error("Invalid TWEET_MEDIA_REQUEST_TIMEOUT value")
            })?;
        }

        if let Ok(val) = std::env::var("TWEET_MEDIA_CHUNK_SIZE") {
            config.upload.chunk_size = val
                .parse()
                .map_err(|_| MediaError::config_error("Invalid TWEET_MEDIA_CHUNK_SIZE value"))?;
        }

        if let Ok(val) = std::env::var("TWEET_MEDIA_MAX_STATUS_CHECKS") {
            config.upload.max_status_checks = val.parse().map_err(|_| {
                MediaError::config_error("Invalid TWEET_MEDIA_MAX_STATUS_CHECKS value")
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for consistency and constraints.
    pub fn validate(&self) -> Result<()> {
        if self.http.request_timeout_secs == 0 {
            return Err(MediaError::config_error(
                "request_timeout_secs must be greater than 0",
            ));
        }

        if self.http.connect_timeout_secs == 0 {
            return Err(MediaError::config_error(
                "connect_timeout_secs must be greater than 0",
            ));
        }

        Url::parse(&self.http.upload_url)?;
        Url::parse(&self.http.status_url)?;

        if self.upload.chunk_size == 0 {
            return Err(MediaError::config_error(
                "chunk_size must be greater than 0",
            ));
        }

        if self.upload.chunk_size > MAX_CHUNK_SIZE {
            return Err(MediaError::config_error(format!(
                "chunk_size should not exceed {MAX_CHUNK_SIZE} bytes"
            )));
        }

        if self.upload.max_status_checks == 0 {
            return Err(MediaError::config_error(
                "max_status_checks must be greater than 0",
            ));
        }

        if self.upload.default_check_after_secs > self.upload.max_check_after_secs {
            return Err(MediaError::config_error(
                "default_check_after_secs must not exceed max_check_after_secs",
            ));
        }

        Ok(())
    }

    /// Converts HTTP timeout to Duration types for easier use.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Converts HTTP timeout to Duration types for easier use.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_secs)
    }
}

impl UploadConfig {
    /// Creates a new upload config builder.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder::default()
    }

    /// Resolves the wait before the next STATUS request.
    ///
    /// Falls back to `default_check_after_secs` when the server gave no hint
    /// and never exceeds `max_check_after_secs`.
    pub fn poll_delay(&self, check_after_secs: Option<u64>) -> Duration {
        let secs = check_after_secs
            .unwrap_or(self.default_check_after_secs)
            .min(self.max_check_after_secs);
        Duration::from_secs(secs)
    }
}

impl HttpConfig {
    /// Creates a new HTTP config builder.
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Builder for creating Config instances.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    http: Option<HttpConfig>,
    upload: Option<UploadConfig>,
}

impl ConfigBuilder {
    /// Sets the HTTP configuration.
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the upload configuration.
    pub fn upload(mut self, upload: UploadConfig) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Config {
        Config {
            http: self.http.unwrap_or_default(),
            upload: self.upload.unwrap_or_default(),
        }
    }
}

/// Builder for HttpConfig.
#[derive(Debug, Default)]
pub struct HttpConfigBuilder {
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    upload_url: Option<String>,
    status_url: Option<String>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.request_timeout_secs = Some(timeout);
        self
    }

    pub fn connect_timeout_secs(mut self, timeout: u64) -> Self {
        self.connect_timeout_secs = Some(timeout);
        self
    }

    pub fn upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = Some(url.into());
        self
    }

    pub fn status_url(mut self, url: impl Into<String>) -> Self {
        self.status_url = Some(url.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> HttpConfig {
        let default = HttpConfig::default();
        HttpConfig {
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(default.connect_timeout_secs),
            upload_url: self.upload_url.unwrap_or(default.upload_url),
            status_url: self.status_url.unwrap_or(default.status_url),
            user_agent: self.user_agent.unwrap_or(default.user_agent),
        }
    }
}

/// Builder for UploadConfig.
#[derive(Debug, Default)]
pub struct UploadConfigBuilder {
    chunk_size: Option<usize>,
    max_status_checks: Option<u32>,
    default_check_after_secs: Option<u64>,
    max_check_after_secs: Option<u64>,
}

impl UploadConfigBuilder {
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    pub fn max_status_checks(mut self, checks: u32) -> Self {
        self.max_status_checks = Some(checks);
        self
    }

    pub fn default_check_after_secs(mut self, secs: u64) -> Self {
        self.default_check_after_secs = Some(secs);
        self
    }

    pub fn max_check_after_secs(mut self, secs: u64) -> Self {
        self.max_check_after_secs = Some(secs);
        self
    }

    pub fn build(self) -> UploadConfig {
        let default = UploadConfig::default();
        UploadConfig {
            chunk_size: self.chunk_size.unwrap_or(default.chunk_size),
            max_status_checks: self.max_status_checks.unwrap_or(default.max_status_checks),
            default_check_after_secs: self
                .default_check_after_secs
                .unwrap_or(default.default_check_after_secs),
            max_check_after_secs: self
                .max_check_after_secs
                .unwrap_or(default.max_check_after_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.upload.chunk_size, 1024 * 1024);
        assert_eq!(config.upload.max_status_checks, 60);
        assert_eq!(config.http.upload_url, DEFAULT_UPLOAD_URL);
        assert_eq!(config.http.status_url, DEFAULT_STATUS_URL);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .http(
                HttpConfig::builder()
                    .upload_url("http://127.0.0.1:9000/media")
                    .request_timeout_secs(5)
                    .build(),
            )
            .upload(
                UploadConfig::builder()
                    .chunk_size(4096)
                    .max_status_checks(3)
                    .build(),
            )
            .build();

        assert_eq!(config.http.upload_url, "http://127.0.0.1:9000/media");
        assert_eq!(config.http.status_url, DEFAULT_STATUS_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.upload.chunk_size, 4096);
        assert_eq!(config.upload.max_status_checks, 3);
        assert_eq!(config.upload.default_check_after_secs, 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.upload.chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upload.chunk_size = MAX_CHUNK_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upload.max_status_checks = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.upload_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(MediaError::UrlParse(_))));

        let mut config = Config::default();
        config.upload.default_check_after_secs = 600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_delay() {
        let upload = UploadConfig::builder()
            .default_check_after_secs(2)
            .max_check_after_secs(10)
            .build();

        assert_eq!(upload.poll_delay(Some(1)), Duration::from_secs(1));
        assert_eq!(upload.poll_delay(None), Duration::from_secs(2));
        assert_eq!(upload.poll_delay(Some(3600)), Duration::from_secs(10));
    }

    #[test]
    fn test_environment_loading() {
        unsafe {
            std::env::set_var("TWEET_MEDIA_CHUNK_SIZE", "524288");
            std::env::set_var("TWEET_MEDIA_MAX_STATUS_CHECKS", "7");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.upload.chunk_size, 524288);
        assert_eq!(config.upload.max_status_checks, 7);

        unsafe {
            std::env::set_var("TWEET_MEDIA_CHUNK_SIZE", "lots");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            std::env::remove_var("TWEET_MEDIA_CHUNK_SIZE");
            std::env::remove_var("TWEET_MEDIA_MAX_STATUS_CHECKS");
        }
    }
}
