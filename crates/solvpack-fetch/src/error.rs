//! Error types for solvpack-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("payload from {url} is not a zip archive ({len} bytes)")]
    NotAnArchive { url: String, len: usize },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("invalid SHA-256 digest: {0}")]
    InvalidChecksum(String),

    #[error("giving up on {url} after {attempts} attempts: {last}")]
    MaxRetriesExceeded {
        url:      String,
        attempts: u32,
        #[source]
        last:     Box<FetchError>,
    },

    #[error("failed to place download: {0}")]
    Placement(#[from] solvpack_fs::Error),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
