//! Solver binary discovery.
//!
//! Candidates are probed strictly in order and the first usable one wins.
//! Only when every candidate misses does the locator walk the fallback root,
//! picking the lexicographically first match when there are several.

use std::path::{Path, PathBuf};

use solvpack_fs::{MatchOptions, find_files_named};
use tracing::{debug, info, warn};

use crate::artifact::{BinaryArtifact, FsProbe, Probe};
use crate::error::{Error, Result};

pub struct Locator<P = FsProbe> {
    binary_name:      String,
    candidates:       Vec<PathBuf>,
    fallback_root:    Option<PathBuf>,
    case_insensitive: bool,
    probe:            P,
}

impl Locator<FsProbe> {
    pub fn new(binary_name: impl Into<String>) -> Self {
        Self {
            binary_name:      binary_name.into(),
            candidates:       Vec::new(),
            fallback_root:    None,
            case_insensitive: false,
            probe:            FsProbe,
        }
    }
}

impl<P: Probe> Locator<P> {
    pub fn with_probe<Q: Probe>(self, probe: Q) -> Locator<Q> {
        Locator {
            binary_name: self.binary_name,
            candidates: self.candidates,
            fallback_root: self.fallback_root,
            case_insensitive: self.case_insensitive,
            probe,
        }
    }

    pub fn candidate(mut self, path: impl Into<PathBuf>) -> Self {
        self.candidates.push(path.into());
        self
    }

    pub fn candidates<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        self.candidates.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn fallback_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.fallback_root = Some(root.into());
        self
    }

    /// Match file names case-insensitively during the fallback walk (Windows targets).
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn binary_name(&self) -> &str { &self.binary_name }

    pub fn locate(&self) -> Result<BinaryArtifact> {
        let mut probed = Vec::with_capacity(self.candidates.len());

        for candidate in &self.candidates {
            let path = self.expand(candidate);
            debug!(path = %path.display(), "probing candidate");
            if let Some(artifact) = self.probe.probe(&path) {
                info!(path = %artifact.path().display(), size = artifact.size(), "solver binary located");
                return Ok(artifact);
            }
            probed.push(path);
        }

        if let Some(root) = &self.fallback_root {
            if let Some(artifact) = self.search(root)? {
                return Ok(artifact);
            }
        }

        Err(Error::BinaryNotFound {
            name: self.binary_name.clone(),
            probed,
            fallback_root: self.fallback_root.clone(),
        })
    }

    /// A candidate naming a directory means "the binary inside it".
    fn expand(&self, candidate: &Path) -> PathBuf {
        if candidate.is_dir() {
            candidate.join(&self.binary_name)
        } else {
            candidate.to_path_buf()
        }
    }

    fn search(&self, root: &Path) -> Result<Option<BinaryArtifact>> {
        if !root.is_dir() {
            debug!(root = %root.display(), "fallback root does not exist");
            return Ok(None);
        }

        let options = MatchOptions::default().case_insensitive(self.case_insensitive);
        let matches: Vec<BinaryArtifact> = find_files_named(root, &self.binary_name, options)?
            .iter()
            .filter_map(|p| self.probe.probe(p))
            .collect();

        match matches.as_slice() {
            [] => Ok(None),
            [only] => {
                info!(path = %only.path().display(), "solver binary found by fallback search");
                Ok(Some(only.clone()))
            }
            [first, ..] => {
                let all: Vec<String> = matches.iter().map(|a| a.path().display().to_string()).collect();
                warn!(
                    root = %root.display(),
                    chosen = %first.path().display(),
                    matches = ?all,
                    "fallback search found several solver binaries, taking the first"
                );
                Ok(Some(first.clone()))
            }
        }
    }
}

/// Probe `candidates` in order, then search `fallback_root`, for `binary_name`.
pub fn locate(
    candidates: &[PathBuf],
    fallback_root: Option<&Path>,
    binary_name: &str,
) -> Result<BinaryArtifact> {
    let mut locator = Locator::new(binary_name).candidates(candidates.iter().cloned());
    if let Some(root) = fallback_root {
        locator = locator.fallback_root(root);
    }
    locator.locate()
}
