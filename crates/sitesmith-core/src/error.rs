//! Error types and handling for sitesmith-core operations.
//!
//! All public functions in this crate return [`Result<T, Error>`]. Errors that
//! abort a whole generation run live here; conditions that are recoverable at
//! rule or item granularity (skipped rules, missing attributes, failed
//! per-rule fetches) are reported as data in
//! [`GenerationReport`](crate::builder::GenerationReport) instead.
//!
//! Errors carry a coarse category for logging and a recoverability hint for
//! retry logic:
//!
//! ```rust
//! use sitesmith_core::Error;
//!
//! let err = Error::Api { status: 503, url: "https://cms.example.com/api/articles".into() };
//! assert_eq!(err.category(), "api");
//! assert!(err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for sitesmith-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed (reading configuration, writing artifacts).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed before an HTTP response was obtained.
    ///
    /// Connection and timeout errors are typically recoverable; malformed
    /// request errors are permanent.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The content API answered with a non-success HTTP status.
    #[error("API request to '{url}' failed with status {status}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// An API payload could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration is invalid or inaccessible.
    ///
    /// Covers malformed TOML, out-of-range priorities, and missing required
    /// fields that are statically checkable at load time.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL is malformed or invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A category-scoped placeholder was resolved without a related record.
    ///
    /// The builder surfaces this as a per-item warning; it only escapes as an
    /// error when [`resolve`](crate::template::resolve) is called directly
    /// with `category: None` against a template that needs one.
    #[error("Template references category attribute '{0}' but no related record is available")]
    MissingRelation(String),

    /// Every eligible rule failed with a network-class error.
    ///
    /// Individual fetch failures are per-rule warnings; this variant is the
    /// fatal case where the content API could not be reached at all.
    #[error("Content API unreachable: all {attempted} attempted rule(s) failed with network errors")]
    ApiUnreachable {
        /// Number of rules for which a fetch was attempted.
        attempted: usize,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for errors that are typically temporary: connection
    /// failures, timeouts, and server-side (5xx) API responses.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            Self::ApiUnreachable { .. } => true,
            Self::Io(e) => {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
                )
            },
            _ => false,
        }
    }

    /// Get the error category as a string identifier for logging and metrics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Api { .. } => "api",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::MissingRelation(_) => "missing_relation",
            Self::ApiUnreachable { .. } => "api_unreachable",
        }
    }

    /// Whether this error indicates the content API could not be reached.
    ///
    /// Used by the builder to decide when per-rule failures add up to a fatal
    /// [`Error::ApiUnreachable`].
    #[must_use]
    pub fn is_network_class(&self) -> bool {
        matches!(self, Self::Network(_)) || matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
