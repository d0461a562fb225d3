use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{Error, Result};

/// A fresh per-run directory under a staging root.
///
/// Only the run directory is removed on drop, never the staging root or any
/// sibling it already held. A staging root created here is removed too once
/// it is empty again.
pub struct Workspace {
    dir:          Option<TempDir>,
    root:         PathBuf,
    staging_root: PathBuf,
    created_root: bool,
}

impl Workspace {
    pub fn new(staging_root: impl Into<PathBuf>) -> Result<Self> {
        let staging_root = staging_root.into();
        let created_root = !staging_root.exists();
        if created_root {
            fs::create_dir_all(&staging_root).map_err(|e| Error::CreateDir {
                path:   staging_root.clone(),
                source: e,
            })?;
        }

        let dir = tempfile::Builder::new()
            .prefix("run-")
            .tempdir_in(&staging_root)
            .map_err(|e| Error::CreateDir {
                path:   staging_root.clone(),
                source: e,
            })?;
        let root = dir.path().to_path_buf();
        tracing::debug!(path = %root.display(), "created staging directory");

        Ok(Self {
            dir: Some(dir),
            root,
            staging_root,
            created_root,
        })
    }

    pub fn path(&self) -> &Path { &self.root }

    pub fn staging_root(&self) -> &Path { &self.staging_root }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf { self.root.join(rel) }

    pub fn create_dir_all(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        let full = self.root.join(rel);
        fs::create_dir_all(&full).map_err(|e| Error::CreateDir {
            path:   full.clone(),
            source: e,
        })?;
        Ok(full)
    }

    /// Leave the run directory on disk after drop.
    pub fn keep(mut self) -> PathBuf {
        if let Some(dir) = self.dir.take() {
            let _ = dir.keep();
        }
        self.root.clone()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                tracing::warn!(path = %self.root.display(), error = %e, "failed to remove staging directory");
            }
        }
        if self.created_root {
            // fails while anything else still lives there
            let _ = fs::remove_dir(&self.staging_root);
        }
    }
}
