use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use solvpack::{Config, ReleaseConfig, ReleaseManifest};

#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Release tag (default: `[release] tag`)
    #[arg(long)]
    pub tag: Option<String>,

    /// Release title (default: the tag)
    #[arg(long)]
    pub name: Option<String>,

    /// Release notes
    #[arg(long)]
    pub body: Option<String>,

    /// Extra asset file, must exist (repeatable)
    #[arg(short, long = "asset", value_name = "PATH")]
    pub assets: Vec<PathBuf>,

    /// Directory build output to zip
    #[arg(long, value_name = "DIR", requires = "zip_out")]
    pub package_dir: Option<PathBuf>,

    /// Zip written from `--package-dir`
    #[arg(long, value_name = "PATH")]
    pub zip_out: Option<PathBuf>,

    /// Manifest output path
    #[arg(long, value_name = "PATH")]
    pub manifest_out: Option<PathBuf>,
}

impl ReleaseArgs {
    fn merge(self, configured: Option<ReleaseConfig>) -> anyhow::Result<ReleaseConfig> {
        let mut release = match (configured, self.tag) {
            (Some(mut release), tag) => {
                if let Some(tag) = tag {
                    release.tag = tag;
                }
                release
            }
            (None, Some(tag)) => ReleaseConfig {
                tag,
                name: None,
                body: String::new(),
                assets: Vec::new(),
                package_dir: None,
                zip_out: None,
                manifest_out: PathBuf::from("release-manifest.json"),
            },
            (None, None) => anyhow::bail!("no release tag; pass --tag or set [release] tag"),
        };

        if self.name.is_some() {
            release.name = self.name;
        }
        if let Some(body) = self.body {
            release.body = body;
        }
        release.assets.extend(self.assets);
        if self.package_dir.is_some() {
            release.package_dir = self.package_dir;
        }
        if self.zip_out.is_some() {
            release.zip_out = self.zip_out;
        }
        if let Some(out) = self.manifest_out {
            release.manifest_out = out;
        }
        Ok(release)
    }
}

pub fn run(args: ReleaseArgs, config: Config) -> anyhow::Result<()> {
    let release = args.merge(config.release)?;
    let manifest = ReleaseManifest::from_config(&release).context("collecting release assets")?;
    manifest.write_json(&release.manifest_out)?;
    super::print_json(&manifest)
}
