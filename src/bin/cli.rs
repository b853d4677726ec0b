//
//  cli.rs
//  graphgen
//

//! graphgen CLI - build and inspect structural code graphs.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use graphgen::cli::{run, Cli};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the summary.
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
