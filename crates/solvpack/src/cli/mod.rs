//! Command-line adapter over the library.

mod bundle;
mod fetch;
mod locate;
mod release;
mod spec;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use solvpack::{Config, Pipeline, normalize_timestamp};

#[derive(Debug, Parser)]
#[command(name = "solvpack", version, about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Config file (default: ./solvpack.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Target platform, e.g. `windows` or `linux-arm64` (default: host)
    #[arg(long, global = true)]
    pub target: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find the solver binary and print its path
    #[command(visible_alias = "l")]
    Locate(locate::LocateArgs),
    /// Locate, copy to every destination and verify
    #[command(visible_alias = "b")]
    Bundle(bundle::BundleArgs),
    /// Reset the modification time of auxiliary files
    Touch {
        /// Files to stamp (default: `[auxiliary] timestamps`)
        paths: Vec<PathBuf>,
    },
    /// Download and optionally extract the solver archive
    #[command(visible_alias = "f")]
    Fetch(fetch::FetchArgs),
    /// Write or print the packager spec
    Spec(spec::SpecArgs),
    /// Package build output and write the release manifest
    Release(release::ReleaseArgs),
    /// Run the whole pipeline from the config file
    Run {
        /// Keep the staging directory after the run
        #[arg(long)]
        keep_staging: bool,
    },
    /// Print the effective configuration as TOML
    #[command(name = "config", alias = "cfg")]
    ShowConfig,
}

pub fn execute(app: App) -> anyhow::Result<()> {
    let mut config = Config::load(app.global.config.as_deref()).context("loading configuration")?;
    if let Some(target) = app.global.target {
        config.target = Some(target);
    }

    match app.cmd {
        Commands::Locate(args) => locate::run(args, config),
        Commands::Bundle(args) => bundle::run(args, config),
        Commands::Touch { paths } => {
            let paths = if paths.is_empty() { config.auxiliary.timestamps } else { paths };
            let outcomes = paths
                .iter()
                .map(normalize_timestamp)
                .collect::<solvpack::Result<Vec<_>>>()?;
            print_json(&outcomes)
        }
        Commands::Fetch(args) => fetch::run(args, config),
        Commands::Spec(args) => spec::run(args, config),
        Commands::Release(args) => release::run(args, config),
        Commands::Run { keep_staging } => {
            config.keep_staging |= keep_staging;
            let report = Pipeline::new(config).run()?;
            print_json(&report)
        }
        Commands::ShowConfig => {
            print!("{}", toml::to_string_pretty(&config).context("rendering configuration")?);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
