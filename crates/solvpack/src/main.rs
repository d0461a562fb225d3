use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    let app = cli::App::parse();
    init_tracing(app.global.verbose);

    match cli::execute(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over the verbosity flag when set.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::{fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("solvpack=debug,info")
        } else {
            EnvFilter::new("solvpack=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
