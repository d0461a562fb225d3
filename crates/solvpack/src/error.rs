//! Error taxonomy for the bundling pipeline.
//!
//! Every variant is fatal to a run. A missing auxiliary file is not an error;
//! see [`crate::TimestampOutcome::Missing`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to download solver archive: {0}")]
    Download(#[from] solvpack_fetch::FetchError),

    #[error(
        "solver binary '{name}' not found after probing {} candidate(s){}",
        .probed.len(),
        fallback_note(.fallback_root)
    )]
    BinaryNotFound {
        name:          String,
        probed:        Vec<PathBuf>,
        fallback_root: Option<PathBuf>,
    },

    #[error(
        "bundle verification failed for '{label}' at '{destination}': expected {expected} bytes, found {}",
        found_note(.actual)
    )]
    BundleVerification {
        label:       String,
        destination: PathBuf,
        expected:    u64,
        actual:      Option<u64>,
    },

    #[error("release asset missing: '{0}'")]
    MissingReleaseAsset(PathBuf),

    #[error("config file not found: '{0}'")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("failed to write '{path}': {source}")]
    Json {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Archive(#[from] solvpack_archive::Error),

    #[error(transparent)]
    Fs(#[from] solvpack_fs::Error),

    #[error(transparent)]
    Platform(#[from] solvpack_platform::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn fallback_note(root: &Option<PathBuf>) -> String {
    match root {
        Some(root) => format!(" and searching '{}'", root.display()),
        None => String::new(),
    }
}

fn found_note(actual: &Option<u64>) -> String {
    match actual {
        Some(n) => format!("{n} bytes"),
        None => "no file".to_string(),
    }
}
