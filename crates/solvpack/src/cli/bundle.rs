use std::path::PathBuf;

use clap::Args;
use solvpack::{Config, Destination, bundle, locate_from_config};

use super::locate::SearchArgs;

#[derive(Debug, Args)]
pub struct BundleArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Destination as `label=path`; replaces a configured one with the same label (repeatable)
    #[arg(short, long = "dest", value_name = "LABEL=PATH", value_parser = parse_destination)]
    pub destinations: Vec<Destination>,
}

fn parse_destination(s: &str) -> Result<Destination, String> {
    match s.split_once('=') {
        Some((label, path)) if !label.trim().is_empty() && !path.is_empty() => Ok(Destination {
            label: label.trim().to_string(),
            path:  PathBuf::from(path),
        }),
        _ => Err(format!("expected LABEL=PATH, got '{s}'")),
    }
}

pub fn run(args: BundleArgs, mut config: Config) -> anyhow::Result<()> {
    args.search.apply(&mut config);

    let mut destinations = config.destinations();
    for dest in args.destinations {
        destinations.insert(dest.label, dest.path);
    }
    if destinations.is_empty() {
        anyhow::bail!("no bundle destinations configured; pass --dest LABEL=PATH");
    }

    let artifact = locate_from_config(&config)?;
    let report = bundle(&artifact, &destinations)?;
    super::print_json(&report)
}
