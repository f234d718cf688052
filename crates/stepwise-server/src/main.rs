//! `stepwise-server`: serves `POST /solve` over HTTP.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use stepwise::Simplifier;
use tracing::info;

mod config;
mod error;
mod routes;
mod server;

use config::StepwiseConfig;

/// Step-by-step LaTeX math solver over HTTP.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file [default: stepwise.toml if present].
    #[arg(long, env = "STEPWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configuration.
    #[arg(long)]
    bind: Option<String>,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("stepwise-server error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let mut config =
        StepwiseConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    info!(
        bind = %config.server.bind,
        max_body_bytes = config.server.max_body_bytes,
        iter_limit = config.simplify.iter_limit,
        node_limit = config.simplify.node_limit,
        "starting stepwise-server"
    );

    let simplifier = Simplifier::with_config(config.simplify.clone());
    server::serve(&config.server, &simplifier)
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("STEPWISE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
