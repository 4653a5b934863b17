//! Error types and handling for the media upload SDK.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! [`MediaError`] separates failures by where they happen in the upload:
//!
//! - **Network Errors**: connection issues, timeouts (retryable)
//! - **Local File Errors**: missing files, unsupported extensions, short reads (not retryable)
//! - **Protocol Errors**: rejected chunks, non-2xx API responses (situational)
//! - **Processing Errors**: server-side transcoding failed or never finished
//! - **Configuration Errors**: invalid settings or credentials (not retryable)
//!
//! The SDK itself never retries; [`MediaError::is_retryable`] is provided so
//! callers can decide whether to start a fresh upload.
//!
//! ## Usage
//!
//! ```rust
//! use tweet_media_rs::MediaError;
//! use tweet_media_rs::error::ErrorSeverity;
//!
//! fn handle_error(error: MediaError) {
//!     match error.severity() {
//!         ErrorSeverity::Warning => tracing::warn!("Recoverable error: {}", error),
//!         ErrorSeverity::Error => tracing::error!("Error occurred: {}", error),
//!         ErrorSeverity::Critical => tracing::error!("Critical error: {}", error),
//!     }
//! }
//! ```

use std::fmt;

/// Result type alias for media SDK operations.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Error type for media upload and status posting.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Network-related errors (retryable)
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timeout (retryable)
    #[error("Request timeout")]
    Timeout,

    /// File extension has no entry in the media lookup table
    #[error("Unsupported media type for {path}: extension {extension:?} is not supported")]
    UnsupportedMediaType { path: String, extension: String },

    /// File system errors (not retryable)
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}, reason: {reason}")]
    FileRead { path: String, reason: String },

    /// APPEND answered with a status outside 200..=299
    #[error("Chunk {segment_index} of media {media_id} rejected with HTTP {status}")]
    AppendRejected {
        media_id: u64,
        segment_index: u32,
        status: u16,
    },

    /// Non-2xx response from a JSON command (INIT, FINALIZE, STATUS, status update)
    #[error("API error [HTTP {status}]: {message}")]
    Api { status: u16, message: String },

    /// Server-side processing reported `failed`
    #[error("Media processing failed for {media_id}: {reason}")]
    ProcessingFailed { media_id: u64, reason: String },

    /// Processing did not reach a terminal state within the configured checks
    #[error("Media processing for {media_id} did not finish after {attempts} status checks")]
    ProcessingTimeout { media_id: u64, attempts: u32 },

    /// Operation called out of protocol order
    #[error("Invalid upload state: {message}")]
    InvalidState { message: String },

    #[error("Invalid status update: {message}")]
    InvalidStatus { message: String },

    /// Authentication errors (not retryable)
    #[error("Invalid API credentials: {message}")]
    InvalidCredentials { message: String },

    /// Configuration errors (not retryable)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON processing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic errors for wrapping other error types
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MediaError {
    /// Determines if an error is retryable.
    ///
    /// Network errors, timeouts, rejected chunks and server-side (5xx) or
    /// rate-limit (429) API errors are retryable by starting a new upload.
    /// Local file, configuration and processing failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            MediaError::Network(_) | MediaError::Timeout => true,

            MediaError::AppendRejected { status, .. } | MediaError::Api { status, .. } => {
                *status == 429 || *status >= 500
            }

            // Transcoding may still finish later
            MediaError::ProcessingTimeout { .. } => true,

            _ => false,
        }
    }

    /// Gets the severity level of the error for logging purposes.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MediaError::Network(_)
            | MediaError::Timeout
            | MediaError::AppendRejected { .. }
            | MediaError::ProcessingTimeout { .. } => ErrorSeverity::Warning,

            MediaError::InvalidCredentials { .. } => ErrorSeverity::Critical,

            MediaError::Api { status, .. } => match status {
                401 | 403 => ErrorSeverity::Critical,
                _ => ErrorSeverity::Error,
            },

            MediaError::UnsupportedMediaType { .. }
            | MediaError::FileNotFound { .. }
            | MediaError::FileRead { .. }
            | MediaError::ProcessingFailed { .. }
            | MediaError::InvalidState { .. }
            | MediaError::InvalidStatus { .. }
            | MediaError::Config { .. }
            | MediaError::Json(_)
            | MediaError::Io(_)
            | MediaError::UrlParse(_)
            | MediaError::Internal(_) => ErrorSeverity::Error,
        }
    }

    /// Creates an API error from an HTTP status and response body.
    pub fn from_api_response(status: u16, message: impl Into<String>) -> Self {
        MediaError::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a file-related error.
    pub fn file_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MediaError::FileRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        MediaError::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid-state error.
    pub fn state_error(message: impl Into<String>) -> Self {
        MediaError::InvalidState {
            message: message.into(),
        }
    }
}

/// Error severity levels for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Transient errors, a fresh attempt may succeed
    Warning,
    /// Standard errors that affect a single upload
    Error,
    /// Errors that will affect every request (bad credentials)
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryability() {
        assert!(MediaError::Timeout.is_retryable());

        let file_err = MediaError::FileNotFound {
            path: "clip.mp4".to_string(),
        };
        assert!(!file_err.is_retryable());

        let rejected = MediaError::AppendRejected {
            media_id: 1,
            segment_index: 2,
            status: 503,
        };
        assert!(rejected.is_retryable());

        let bad_request = MediaError::from_api_response(400, "bad request");
        assert!(!bad_request.is_retryable());

        let rate_limited = MediaError::from_api_response(429, "too many requests");
        assert!(rate_limited.is_retryable());

        let failed = MediaError::ProcessingFailed {
            media_id: 1,
            reason: "InvalidMedia".to_string(),
        };
        assert!(!failed.is_retryable());
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(MediaError::Timeout.severity(), ErrorSeverity::Warning);

        let config_err = MediaError::config_error("chunk_size must be greater than 0");
        assert_eq!(config_err.severity(), ErrorSeverity::Error);

        let unauthorized = MediaError::from_api_response(401, "Could not authenticate you");
        assert_eq!(unauthorized.severity(), ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_error_creation_helpers() {
        match MediaError::file_error("/tmp/clip.mp4", "unexpected end of file") {
            MediaError::FileRead { path, reason } => {
                assert_eq!(path, "/tmp/clip.mp4");
                assert_eq!(reason, "unexpected end of file");
            }
            other => panic!("Expected FileRead error, got {other:?}"),
        }

        match MediaError::state_error("append before init") {
            MediaError::InvalidState { message } => assert_eq!(message, "append before init"),
            other => panic!("Expected InvalidState error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_media_message() {
        let err = MediaError::UnsupportedMediaType {
            path: "notes.txt".to_string(),
            extension: "txt".to_string(),
        };
        assert!(err.to_string().contains("notes.txt"));
        assert!(err.to_string().contains("\"txt\""));
    }
}
