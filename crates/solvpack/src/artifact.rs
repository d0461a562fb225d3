use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A resolved solver executable. Always has a non-zero size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryArtifact {
    path:     PathBuf,
    size:     u64,
    modified: SystemTime,
}

impl BinaryArtifact {
    /// Inspect `path`; `None` unless it is a regular file with at least one byte.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path).ok()?;
        if !meta.is_file() || meta.len() == 0 {
            return None;
        }

        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Some(Self {
            path,
            size: meta.len(),
            // platforms without mtime support report the epoch
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn size(&self) -> u64 { self.size }

    pub fn modified(&self) -> SystemTime { self.modified }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            path:     self.path.clone(),
            size:     self.size,
            modified: DateTime::<Utc>::from(self.modified),
        }
    }
}

/// Serializable view of a [`BinaryArtifact`].
#[derive(Clone, Debug, Serialize)]
pub struct ArtifactSummary {
    pub path:     PathBuf,
    pub size:     u64,
    pub modified: DateTime<Utc>,
}

/// Checks one filesystem location for a usable binary.
pub trait Probe {
    fn probe(&self, path: &Path) -> Option<BinaryArtifact>;
}

/// Probe backed by filesystem metadata.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

impl Probe for FsProbe {
    fn probe(&self, path: &Path) -> Option<BinaryArtifact> { BinaryArtifact::from_path(path) }
}

impl<P: Probe + ?Sized> Probe for &P {
    fn probe(&self, path: &Path) -> Option<BinaryArtifact> { (**self).probe(path) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_is_not_an_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cbc.exe");
        fs::write(&path, b"").unwrap();
        assert!(BinaryArtifact::from_path(&path).is_none());
    }

    #[test]
    fn directory_is_not_an_artifact() {
        let dir = tempdir().unwrap();
        assert!(BinaryArtifact::from_path(dir.path()).is_none());
    }

    #[test]
    fn artifact_records_size_and_absolute_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cbc");
        fs::write(&path, vec![1u8; 1200]).unwrap();

        let artifact = FsProbe.probe(&path).unwrap();

        assert_eq!(artifact.size(), 1200);
        assert!(artifact.path().is_absolute());
        assert_eq!(artifact.summary().size, 1200);
    }
}
