//! Blocking archive download with retry, payload checks and atomic placement.
//!
//! # Architecture
//!
//! - [`HttpClient`] - transport seam; [`ReqwestClient`] in production, mocks in tests
//! - [`RetryPolicy`] - exponential backoff for transient failures
//! - [`Fetcher`] - download, classify, verify, place
//!
//! The fetcher only places a payload once it is known to be a zip archive and,
//! when a digest is supplied, once its SHA-256 matches.

mod error;
mod fetcher;
mod http;
mod options;
mod retry;

pub use error::{FetchError, Result};
pub use fetcher::{FetchReport, Fetcher};
pub use http::{HttpClient, Response};
pub use options::{FetchOptions, FetchPhase, Progress, parse_sha256};
pub use retry::{RetryPolicy, retry_delay};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
