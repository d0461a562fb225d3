use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use solvpack::{Config, PackagingSpec, locate_from_config};

#[derive(Debug, Args)]
pub struct SpecArgs {
    /// Solver binary to ship (default: located from config)
    #[arg(long, value_name = "PATH")]
    pub solver: Option<PathBuf>,

    /// Write the packaging spec here (default: `[packaging] spec_out`, else stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print packager arguments, one per line, instead of JSON
    #[arg(long)]
    pub args: bool,
}

pub fn run(args: SpecArgs, config: Config) -> anyhow::Result<()> {
    let packaging = config
        .packaging
        .as_ref()
        .context("no [packaging] section in configuration")?;

    let solver = match args.solver {
        Some(path) => path,
        None => locate_from_config(&config)?.path().to_path_buf(),
    };
    let spec = PackagingSpec::from_config(packaging, &solver);

    if args.args {
        for arg in spec.to_args(&config.target_platform()?) {
            println!("{arg}");
        }
        return Ok(());
    }

    match args.out.as_ref().or(packaging.spec_out.as_ref()) {
        Some(out) => {
            spec.write_json(out)?;
            println!("{}", out.display());
            Ok(())
        }
        None => super::print_json(&spec),
    }
}
