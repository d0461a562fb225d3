use std::fmt;
use std::sync::Arc;

use crate::error::{FetchError, Result};
use crate::retry::RetryPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchPhase {
    Connecting,
    Verifying,
    Committing,
    Retrying,
    Completed,
}

#[derive(Clone, Debug)]
pub struct Progress {
    pub phase:   FetchPhase,
    pub attempt: u32,
    pub bytes:   u64,
}

#[derive(Clone, Default)]
pub struct FetchOptions {
    pub retry:       RetryPolicy,
    pub checksum:    Option<[u8; 32]>,
    pub headers:     Vec<(String, String)>,
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("retry", &self.retry)
            .field("checksum", &self.checksum.map(hex::encode))
            .field("headers", &self.headers)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl FetchOptions {
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn checksum(mut self, digest: [u8; 32]) -> Self {
        self.checksum = Some(digest);
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }
}

/// Parse a hex SHA-256 digest as written in config files.
pub fn parse_sha256(digest: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(digest.trim())
        .map_err(|_| FetchError::InvalidChecksum(digest.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| FetchError::InvalidChecksum(digest.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_digest() {
        let hex = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let digest = parse_sha256(hex).unwrap();
        assert_eq!(digest[0], 0xe3);
        assert_eq!(digest[31], 0x55);
    }

    #[test]
    fn parse_short_digest() {
        assert!(matches!(parse_sha256("abcd"), Err(FetchError::InvalidChecksum(_))));
        assert!(matches!(parse_sha256("zz"), Err(FetchError::InvalidChecksum(_))));
    }
}
