//! Shared error type across vigil crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, VigilError>;

/// Unified error type used by core and server.
///
/// Every variant is a startup-time failure: recording a sample never fails,
/// so nothing here is produced while requests are being served.
#[derive(Debug, Error)]
pub enum VigilError {
    /// A metric with the same name is already registered.
    #[error("duplicate metric registration: {0}")]
    DuplicateMetric(String),
    /// Metric or label name is not valid in the exposition format.
    #[error("invalid metric: {0}")]
    InvalidMetric(String),
    /// Histogram bucket layout is empty, non-finite or not strictly increasing.
    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("io: {0}")]
    Io(String),
}

impl VigilError {
    /// Stable short code, used in startup logs.
    pub fn code(&self) -> &'static str {
        match self {
            VigilError::DuplicateMetric(_) => "DUPLICATE_METRIC",
            VigilError::InvalidMetric(_) => "INVALID_METRIC",
            VigilError::InvalidBuckets(_) => "INVALID_BUCKETS",
            VigilError::BadConfig(_) => "BAD_CONFIG",
            VigilError::UnsupportedVersion => "UNSUPPORTED_VERSION",
            VigilError::Io(_) => "IO",
        }
    }
}
