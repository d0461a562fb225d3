use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TimestampOutcome {
    Normalized {
        path:     PathBuf,
        previous: DateTime<Utc>,
        now:      DateTime<Utc>,
    },
    /// The optional file was absent; the run continues.
    Missing { path: PathBuf },
}

/// Stamp `path` with the current wall-clock time, whatever its previous value.
pub fn normalize_timestamp(path: impl AsRef<Path>) -> Result<TimestampOutcome> {
    normalize_timestamp_at(path, SystemTime::now())
}

pub fn normalize_timestamp_at(path: impl AsRef<Path>, now: SystemTime) -> Result<TimestampOutcome> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "auxiliary artifact missing, skipping timestamp normalization");
        return Ok(TimestampOutcome::Missing {
            path: path.to_path_buf(),
        });
    }

    let previous = DateTime::<Utc>::from(solvpack_fs::modified(path)?);
    solvpack_fs::set_modified(path, now)?;
    let now = DateTime::<Utc>::from(now);

    info!(path = %path.display(), %previous, %now, "normalized modification time");
    Ok(TimestampOutcome::Normalized {
        path: path.to_path_buf(),
        previous,
        now,
    })
}
