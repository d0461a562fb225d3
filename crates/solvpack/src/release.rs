//! Local release artifacts and the manifest handed to the publishing step.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solvpack_archive::pack_dir;

use crate::config::ReleaseConfig;
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub path:         PathBuf,
    pub name:         String,
    pub content_type: String,
    pub size:         u64,
}

impl ReleaseAsset {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path)
            .ok()
            .filter(|m| m.is_file())
            .ok_or_else(|| Error::MissingReleaseAsset(path.to_path_buf()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::MissingReleaseAsset(path.to_path_buf()))?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            content_type: content_type_for(path).to_string(),
            size: meta.len(),
        })
    }
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("exe") => "application/vnd.microsoft.portable-executable",
        Some("zip") => "application/zip",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Zip a directory build output and describe it as a release asset.
pub fn package_zip(src_dir: &Path, dest: &Path) -> Result<ReleaseAsset> {
    pack_dir(src_dir, dest)?;
    ReleaseAsset::from_path(dest)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    pub tag:    String,
    pub name:   String,
    pub body:   String,
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseManifest {
    pub fn new(tag: impl Into<String>, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            tag:    tag.into(),
            name:   name.into(),
            body:   body.into(),
            assets: Vec::new(),
        }
    }

    /// Build from the `[release]` section. Packages `package_dir` into `zip_out`
    /// first when both are set; every listed asset must already exist.
    pub fn from_config(config: &ReleaseConfig) -> Result<Self> {
        let name = config.name.clone().unwrap_or_else(|| config.tag.clone());
        let mut manifest = Self::new(&config.tag, name, &config.body);

        if let (Some(dir), Some(zip_out)) = (&config.package_dir, &config.zip_out) {
            let asset = package_zip(dir, zip_out)?;
            manifest.assets.retain(|a| a.name != asset.name);
            manifest.assets.push(asset);
        }
        for asset in &config.assets {
            manifest.add_asset(asset)?;
        }
        Ok(manifest)
    }

    /// Add an asset; fails if the file is not on disk.
    pub fn add_asset(&mut self, path: impl AsRef<Path>) -> Result<&ReleaseAsset> {
        let asset = ReleaseAsset::from_path(path)?;
        self.assets.retain(|a| a.name != asset.name);
        self.assets.push(asset);
        Ok(&self.assets[self.assets.len() - 1])
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| Error::Json {
            path:   path.to_path_buf(),
            source: e,
        })?;
        solvpack_fs::atomic_write(path, &json)?;
        tracing::info!(path = %path.display(), tag = %self.tag, assets = self.assets.len(), "wrote release manifest");
        Ok(())
    }
}
