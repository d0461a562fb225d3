use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use solvpack_archive::detect_format;

use crate::error::{FetchError, Result};
use crate::http::HttpClient;
use crate::options::{FetchOptions, FetchPhase, Progress};

#[derive(Clone, Debug)]
pub struct FetchReport {
    pub path:     PathBuf,
    pub bytes:    u64,
    pub attempts: u32,
    pub sha256:   String,
}

/// Downloads zip archives through an [`HttpClient`].
pub struct Fetcher<C: HttpClient> {
    client: C,
    sleep:  fn(Duration),
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            sleep: std::thread::sleep,
        }
    }

    /// Replace the backoff sleeper, for callers that must not block.
    pub fn with_sleeper(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// Download `url` and place it at `destination` once it is known to be a zip archive.
    pub fn fetch_archive(
        &self,
        url: &str,
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<FetchReport> {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let max_attempts = options.retry.max_attempts();
        let mut attempt = 0;

        let body = loop {
            attempt += 1;
            report(options, FetchPhase::Connecting, attempt, 0);

            match self.download(url, options) {
                Ok(body) => break body,
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = options.retry.delay(attempt - 1);
                    tracing::warn!(url, attempt, error = %e, ?delay, "download failed, retrying");
                    report(options, FetchPhase::Retrying, attempt, 0);
                    (self.sleep)(delay);
                }
                Err(e) if e.is_transient() && attempt > 1 => {
                    return Err(FetchError::MaxRetriesExceeded {
                        url: url.to_string(),
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        };

        let bytes = body.len() as u64;
        report(options, FetchPhase::Verifying, attempt, bytes);

        if detect_format(&body).is_none() {
            return Err(FetchError::NotAnArchive {
                url: url.to_string(),
                len: body.len(),
            });
        }

        let digest: [u8; 32] = Sha256::digest(&body).into();
        if let Some(expected) = options.checksum {
            if digest != expected {
                return Err(FetchError::ChecksumMismatch {
                    expected: hex::encode(expected),
                    actual:   hex::encode(digest),
                });
            }
        }

        report(options, FetchPhase::Committing, attempt, bytes);
        solvpack_fs::atomic_write(destination, &body)?;
        report(options, FetchPhase::Completed, attempt, bytes);

        tracing::info!(url, path = %destination.display(), bytes, attempts = attempt, "archive downloaded");
        Ok(FetchReport {
            path: destination.to_path_buf(),
            bytes,
            attempts: attempt,
            sha256: hex::encode(digest),
        })
    }

    fn download(&self, url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url, &options.headers)
            .map_err(|e| FetchError::Network {
                url:     url.to_string(),
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(FetchError::Http {
                url:    url.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }
}

fn report(options: &FetchOptions, phase: FetchPhase, attempt: u32, bytes: u64) {
    if let Some(callback) = &options.on_progress {
        callback(&Progress {
            phase,
            attempt,
            bytes,
        });
    }
}
