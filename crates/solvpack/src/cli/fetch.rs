use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use solvpack::Config;
use solvpack_archive::{ExtractOptions, extract_zip_file};
use solvpack_fetch::{Fetcher, ReqwestClient, parse_sha256};

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Archive URL (default: `[solver] download_url`)
    #[arg(long)]
    pub url: Option<String>,

    /// Where the archive is written
    #[arg(short, long, default_value = "solver.zip")]
    pub out: PathBuf,

    /// Expected SHA-256 of the archive, hex encoded
    #[arg(long)]
    pub sha256: Option<String>,

    /// Retries after the first attempt (default: `[download] max_retries`)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Extract the archive into this directory
    #[arg(long, value_name = "DIR")]
    pub extract: Option<PathBuf>,
}

pub fn run(args: FetchArgs, mut config: Config) -> anyhow::Result<()> {
    let url = args
        .url
        .or_else(|| config.solver.download_url.clone())
        .context("no download URL; pass --url or set [solver] download_url")?;
    if let Some(retries) = args.retries {
        config.download.max_retries = retries;
    }

    let mut options = config.fetch_options()?;
    if let Some(digest) = &args.sha256 {
        options = options.checksum(parse_sha256(digest)?);
    }

    let client = ReqwestClient::new(Duration::from_secs(config.download.timeout_secs))?;
    let report = Fetcher::new(client).fetch_archive(&url, &args.out, &options)?;
    tracing::info!(path = %report.path.display(), bytes = report.bytes, sha256 = %report.sha256, "archive downloaded");

    if let Some(dir) = &args.extract {
        let options = ExtractOptions::default().strip_components(config.solver.strip_components);
        let extracted = extract_zip_file(&report.path, dir, &options)?;
        for entry in extracted.files() {
            println!("{}", entry.target_path.display());
        }
    } else {
        println!("{}", report.path.display());
    }
    Ok(())
}
