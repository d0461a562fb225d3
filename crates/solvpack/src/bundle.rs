//! Copy a located binary to every place a packaged build may look for it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solvpack_fs::{AtomicCopyOptions, atomic_copy};
use tracing::{debug, info, warn};

use crate::artifact::BinaryArtifact;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub label: String,
    pub path:  PathBuf,
}

/// Labelled output paths, kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DestinationSet {
    entries: Vec<Destination>,
}

impl DestinationSet {
    pub fn new() -> Self { Self::default() }

    /// Add or replace a destination. A replaced label keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        let label = label.into();
        let path = path.into();
        match self.entries.iter_mut().find(|d| d.label == label) {
            Some(existing) => Some(std::mem::replace(&mut existing.path, path)),
            None => {
                self.entries.push(Destination { label, path });
                None
            }
        }
    }

    pub fn with(mut self, label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(label, path);
        self
    }

    pub fn get(&self, label: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.path.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> { self.entries.iter() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl FromIterator<Destination> for DestinationSet {
    fn from_iter<I: IntoIterator<Item = Destination>>(iter: I) -> Self {
        let mut set = Self::new();
        for d in iter {
            set.insert(d.label, d.path);
        }
        set
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BundledCopy {
    pub label: String,
    pub path:  PathBuf,
    pub bytes: u64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BundleReport {
    pub copies: Vec<BundledCopy>,
}

impl BundleReport {
    /// The first bundled copy, used as the packaging source.
    pub fn primary(&self) -> Option<&Path> { self.copies.first().map(|c| c.path.as_path()) }
}

/// Copy `artifact` to every destination, then verify each copy.
pub fn bundle(artifact: &BinaryArtifact, destinations: &DestinationSet) -> Result<BundleReport> {
    if destinations.is_empty() {
        warn!("no bundle destinations configured");
    }

    let mut report = BundleReport::default();
    for dest in destinations.iter() {
        let bytes = if is_same_file(artifact.path(), &dest.path) {
            debug!(label = %dest.label, path = %dest.path.display(), "destination is the source, skipping copy");
            artifact.size()
        } else {
            atomic_copy(artifact.path(), &dest.path, AtomicCopyOptions::new())?
        };

        info!(label = %dest.label, path = %dest.path.display(), bytes, "bundled solver");
        report.copies.push(BundledCopy {
            label: dest.label.clone(),
            path: dest.path.clone(),
            bytes,
        });
    }

    verify(artifact, destinations)?;
    Ok(report)
}

/// Re-probe every destination and compare its size with the artifact's.
pub fn verify(artifact: &BinaryArtifact, destinations: &DestinationSet) -> Result<()> {
    for dest in destinations.iter() {
        let actual = fs::metadata(&dest.path)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len());

        if actual != Some(artifact.size()) {
            return Err(Error::BundleVerification {
                label: dest.label.clone(),
                destination: dest.path.clone(),
                expected: artifact.size(),
                actual,
            });
        }
    }
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
