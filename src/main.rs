use clap::Parser;
use std::io::{self, IsTerminal};
use std::process;

use tracing_subscriber::EnvFilter;
use webtrack::cli::Cli;
use webtrack::config::{load_config, ResolvedConfig};
use webtrack::error::Result;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let resolved = ResolvedConfig::from_config(&config);

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| resolved.log.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();

    webtrack::router::run(cli, &resolved)
}
