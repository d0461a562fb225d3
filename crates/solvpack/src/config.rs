//! Layered configuration: defaults, then `solvpack.toml`, then `SOLVPACK_*` env vars.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use solvpack_fetch::{FetchOptions, RetryPolicy, parse_sha256};
use solvpack_platform::TargetPlatform;

use crate::bundle::{Destination, DestinationSet};
use crate::error::{Error, Result};
use crate::packaging::FilePair;

pub const DEFAULT_CONFIG_FILE: &str = "solvpack.toml";
pub const ENV_PREFIX: &str = "SOLVPACK_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build target such as `windows` or `windows-x86_64`; the host when unset.
    pub target:       Option<String>,
    pub staging_dir:  PathBuf,
    pub keep_staging: bool,
    pub solver:       SolverConfig,
    pub download:     DownloadConfig,
    pub bundle:       BundleConfig,
    pub auxiliary:    AuxiliaryConfig,
    pub packaging:    Option<PackagingConfig>,
    pub release:      Option<ReleaseConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target:       None,
            staging_dir:  PathBuf::from("build/solvpack-staging"),
            keep_staging: false,
            solver:       SolverConfig::default(),
            download:     DownloadConfig::default(),
            bundle:       BundleConfig::default(),
            auxiliary:    AuxiliaryConfig::default(),
            packaging:    None,
            release:      None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// File stem; the target's executable suffix is appended.
    pub name:             String,
    pub candidates:       Vec<PathBuf>,
    pub fallback_root:    Option<PathBuf>,
    pub download_url:     Option<String>,
    pub sha256:           Option<String>,
    pub strip_components: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            name:             "cbc".to_string(),
            candidates:       Vec::new(),
            fallback_root:    None,
            download_url:     None,
            sha256:           None,
            strip_components: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub max_retries:  u32,
    pub backoff_ms:   u64,
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_retries:  2,
            backoff_ms:   500,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuxiliaryConfig {
    /// Optional files whose modification time is reset before packaging.
    pub timestamps: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingConfig {
    pub name:           String,
    pub entry_script:   PathBuf,
    #[serde(default)]
    pub onefile:        bool,
    #[serde(default)]
    pub hidden_imports: Vec<String>,
    #[serde(default = "default_solver_subdirs")]
    pub solver_subdirs: Vec<String>,
    #[serde(default)]
    pub datas:          Vec<FilePair>,
    #[serde(default)]
    pub spec_out:       Option<PathBuf>,
}

fn default_solver_subdirs() -> Vec<String> { vec![".".to_string(), "solver".to_string()] }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
    pub tag:          String,
    #[serde(default)]
    pub name:         Option<String>,
    #[serde(default)]
    pub body:         String,
    #[serde(default)]
    pub assets:       Vec<PathBuf>,
    #[serde(default)]
    pub package_dir:  Option<PathBuf>,
    #[serde(default)]
    pub zip_out:      Option<PathBuf>,
    #[serde(default = "default_manifest_out")]
    pub manifest_out: PathBuf,
}

fn default_manifest_out() -> PathBuf { PathBuf::from("release-manifest.json") }

impl Config {
    /// Provider stack; an explicit `path` must exist.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let file = match path {
            Some(p) if !p.is_file() => return Err(Error::ConfigNotFound(p.to_path_buf())),
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        Ok(Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> { Ok(Self::figment(path)?.extract()?) }

    pub fn target_platform(&self) -> Result<TargetPlatform> {
        match &self.target {
            Some(t) => Ok(t.parse()?),
            None => Ok(TargetPlatform::host()?),
        }
    }

    pub fn binary_name(&self) -> Result<String> {
        Ok(self.target_platform()?.executable_name(&self.solver.name))
    }

    pub fn destinations(&self) -> DestinationSet {
        self.bundle.destinations.iter().cloned().collect()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.download.max_retries,
            Duration::from_millis(self.download.backoff_ms),
        )
    }

    pub fn fetch_options(&self) -> Result<FetchOptions> {
        let mut options = FetchOptions::default().retry(self.retry_policy());
        if let Some(digest) = &self.solver.sha256 {
            options = options.checksum(parse_sha256(digest)?);
        }
        Ok(options)
    }
}
