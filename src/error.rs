//! Error types for assetq
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for assetq
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Parameter Errors
    // ============================================================================
    #[error("invalid pagination parameters: {field} must be greater than 0")]
    InvalidPagination { field: &'static str },

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Cancellation Errors
    // ============================================================================
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded after {elapsed_ms}ms")]
    DeadlineExceeded { elapsed_ms: u64 },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// User-facing classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any network activity
    InvalidParameters,
    /// Stop requested by the caller
    Cancelled,
    /// Run deadline expired
    DeadlineExceeded,
    /// Network-level failure
    Transport,
    /// The platform answered with an error status
    Remote,
    /// Response could not be understood
    Protocol,
    /// Local configuration problem
    Config,
    /// Anything else
    Other,
}

impl ErrorKind {
    /// Short label used in CLI output
    pub fn label(self) -> &'static str {
        match self {
            Self::InvalidParameters => "invalid parameters",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline exceeded",
            Self::Transport => "network error",
            Self::Remote => "remote service error",
            Self::Protocol => "protocol error",
            Self::Config => "configuration error",
            Self::Other => "error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Error {
    /// Create an invalid pagination error for the named bound
    pub fn invalid_pagination(field: &'static str) -> Self {
        Self::InvalidPagination { field }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify this error for the user
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPagination { .. } | Error::InvalidArgument { .. } => {
                ErrorKind::InvalidParameters
            }
            Error::Cancelled => ErrorKind::Cancelled,
            Error::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            Error::Http(_)
            | Error::RateLimited { .. }
            | Error::Timeout { .. }
            | Error::MaxRetriesExceeded { .. } => ErrorKind::Transport,
            Error::HttpStatus { .. } => ErrorKind::Remote,
            Error::JsonParse(_) | Error::Decode { .. } => ErrorKind::Protocol,
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_)
            | Error::Io(_) => ErrorKind::Config,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Check if this error is transient and worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => Self::is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if an HTTP status is transient: 429, 5xx gateway errors and the
    /// 52x origin errors returned by CDN fronts
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(
            status,
            429 | 500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
        )
    }
}

/// Result type alias for assetq
pub type Result<T> = std::result::Result<T, Error>;
