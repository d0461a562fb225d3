//! One bundling run: fetch → locate → bundle → verify → normalize → spec → release.
//!
//! Every step runs in sequence on the calling thread and the first fatal
//! error aborts the run. The located [`BinaryArtifact`] is handed from step
//! to step by value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use solvpack_archive::{ExtractOptions, extract_zip_file};
use solvpack_fetch::{FetchReport, Fetcher, HttpClient};
use solvpack_fs::{MatchOptions, Workspace};
use solvpack_platform::TargetPlatform;
use tracing::{debug, info, info_span, warn};

use crate::artifact::{ArtifactSummary, BinaryArtifact};
use crate::bundle::{BundleReport, bundle};
use crate::config::{Config, PackagingConfig, ReleaseConfig};
use crate::error::Result;
use crate::locate::Locator;
use crate::packaging::PackagingSpec;
use crate::release::ReleaseManifest;
use crate::timestamp::{TimestampOutcome, normalize_timestamp};

#[derive(Clone, Debug, Serialize)]
pub struct DownloadSummary {
    pub url:       String,
    pub bytes:     u64,
    pub attempts:  u32,
    pub sha256:    String,
    pub extracted: Vec<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    pub target:     String,
    pub download:   Option<DownloadSummary>,
    pub artifact:   ArtifactSummary,
    pub bundle:     BundleReport,
    pub timestamps: Vec<TimestampOutcome>,
    pub packaging:  Option<PackagingSpec>,
    pub release:    Option<ReleaseManifest>,
    pub staging:    Option<PathBuf>,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self { Self { config } }

    pub fn config(&self) -> &Config { &self.config }

    /// Run with the production HTTP client.
    pub fn run(&self) -> Result<PipelineReport> {
        let timeout = Duration::from_secs(self.config.download.timeout_secs);
        let client = solvpack_fetch::ReqwestClient::new(timeout).map_err(|e| {
            solvpack_fetch::FetchError::Network {
                url:     self.config.solver.download_url.clone().unwrap_or_default(),
                message: e.to_string(),
            }
        })?;
        self.run_with(Fetcher::new(client))
    }

    pub fn run_with<C: HttpClient>(&self, fetcher: Fetcher<C>) -> Result<PipelineReport> {
        let target = self.config.target_platform()?;
        let binary_name = target.executable_name(&self.config.solver.name);
        let _span = info_span!("bundle", platform = %target, binary = %binary_name).entered();

        let mut staging = None;
        let mut download = None;
        let mut extracted = Vec::new();

        if let Some(url) = &self.config.solver.download_url {
            let workspace = Workspace::new(&self.config.staging_dir)?;
            let (report, found) = self.fetch_and_extract(&fetcher, url, &workspace, &target, &binary_name)?;
            download = Some(DownloadSummary {
                url:       url.clone(),
                bytes:     report.bytes,
                attempts:  report.attempts,
                sha256:    report.sha256,
                extracted: found.clone(),
            });
            extracted = found;
            staging = Some(workspace);
        }

        let artifact = configured_locator(&self.config, &target, extracted).locate()?;

        let destinations = self.config.destinations();
        let bundled = bundle(&artifact, &destinations)?;

        let timestamps = self
            .config
            .auxiliary
            .timestamps
            .iter()
            .map(normalize_timestamp)
            .collect::<Result<Vec<_>>>()?;

        let source = bundled.primary().unwrap_or(artifact.path()).to_path_buf();
        let packaging = self
            .config
            .packaging
            .as_ref()
            .map(|p| write_packaging_spec(p, &source, &target))
            .transpose()?;

        let release = self.config.release.as_ref().map(build_release).transpose()?;

        // Without bundled copies the staged binary is the only copy left.
        let keep = self.config.keep_staging || (bundled.copies.is_empty() && staging.is_some());
        let staging = match staging {
            Some(workspace) if keep => Some(workspace.keep()),
            _ => None,
        };

        info!(copies = bundled.copies.len(), "bundle complete");
        Ok(PipelineReport {
            target: target.to_string(),
            download,
            artifact: artifact.summary(),
            bundle: bundled,
            timestamps,
            packaging,
            release,
            staging,
        })
    }

    fn fetch_and_extract<C: HttpClient>(
        &self,
        fetcher: &Fetcher<C>,
        url: &str,
        workspace: &Workspace,
        target: &TargetPlatform,
        binary_name: &str,
    ) -> Result<(FetchReport, Vec<PathBuf>)> {
        let archive = workspace.join("solver.zip");
        let report = fetcher.fetch_archive(url, &archive, &self.config.fetch_options()?)?;

        // the workspace is fresh per run, so nothing else lives here
        let extract_dir = workspace.create_dir_all("extract")?;
        let options = ExtractOptions::default().strip_components(self.config.solver.strip_components);
        let extracted = extract_zip_file(&archive, &extract_dir, &options)?;
        info!(entries = extracted.entry_count, bytes = extracted.total_bytes, "solver archive extracted");

        let options = MatchOptions::default().case_insensitive(target.os.case_insensitive_names());
        let mut found: Vec<PathBuf> = extracted
            .files()
            .filter(|entry| options.file_name_is(&entry.target_path, binary_name))
            .map(|entry| entry.target_path.clone())
            .collect();
        found.sort();
        if found.is_empty() {
            warn!(url, binary = binary_name, "downloaded archive does not contain the solver binary");
        }
        Ok((report, found))
    }
}

fn write_packaging_spec(
    config: &PackagingConfig,
    solver: &Path,
    target: &TargetPlatform,
) -> Result<PackagingSpec> {
    let spec = PackagingSpec::from_config(config, solver);
    if let Some(out) = &config.spec_out {
        spec.write_json(out)?;
        info!(path = %out.display(), "wrote packaging spec");
    }
    debug!(args = ?spec.to_args(target), "packager arguments");
    Ok(spec)
}

fn build_release(config: &ReleaseConfig) -> Result<ReleaseManifest> {
    let manifest = ReleaseManifest::from_config(config)?;
    manifest.write_json(&config.manifest_out)?;
    Ok(manifest)
}

/// Locate only, for callers that do not bundle.
pub fn locate_from_config(config: &Config) -> Result<BinaryArtifact> {
    let target = config.target_platform()?;
    configured_locator(config, &target, Vec::new()).locate()
}

/// `leading` candidates are probed before the configured ones.
fn configured_locator(config: &Config, target: &TargetPlatform, leading: Vec<PathBuf>) -> Locator {
    let mut locator = Locator::new(target.executable_name(&config.solver.name))
        .candidates(leading)
        .candidates(config.solver.candidates.iter().cloned())
        .case_insensitive(target.os.case_insensitive_names());
    if let Some(root) = &config.solver.fallback_root {
        locator = locator.fallback_root(root);
    }
    locator
}
