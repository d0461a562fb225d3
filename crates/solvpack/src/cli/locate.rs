use std::path::PathBuf;

use clap::Args;
use solvpack::{Config, locate_from_config};

#[derive(Debug, Args)]
pub struct LocateArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Print the artifact as JSON instead of its path
    #[arg(long)]
    pub json: bool,
}

/// Candidate overrides shared by `locate` and `bundle`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Candidate path, probed before configured ones (repeatable)
    #[arg(short, long = "candidate", value_name = "PATH")]
    pub candidates: Vec<PathBuf>,

    /// Directory searched recursively when no candidate matches
    #[arg(long, value_name = "DIR")]
    pub fallback_root: Option<PathBuf>,

    /// Solver name without platform suffix
    #[arg(long)]
    pub name: Option<String>,
}

impl SearchArgs {
    pub fn apply(self, config: &mut Config) {
        if let Some(name) = self.name {
            config.solver.name = name;
        }
        if !self.candidates.is_empty() {
            let configured = std::mem::take(&mut config.solver.candidates);
            config.solver.candidates = self.candidates.into_iter().chain(configured).collect();
        }
        if let Some(root) = self.fallback_root {
            config.solver.fallback_root = Some(root);
        }
    }
}

pub fn run(args: LocateArgs, mut config: Config) -> anyhow::Result<()> {
    args.search.apply(&mut config);
    let artifact = locate_from_config(&config)?;
    if args.json {
        super::print_json(&artifact.summary())
    } else {
        println!("{}", artifact.path().display());
        Ok(())
    }
}
