//! BmCS - Biomedical Citation Selector
//! Entry point for the `bmcs` binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bmcs_cli::{Cli, Pipeline};
use bmcs_common::{BmcsError, RunMode};
use bmcs_config::{Config, ConfigError};
use bmcs_eval::Dataset;

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    match loaded {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(path)) if cli.config.is_none() => {
            info!(path = %path.display(), "No configuration file, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).context("loading configuration"),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let flags = cli.flags();
    let destination = cli.dest.clone().unwrap_or_else(|| config.output.destination.clone());

    let pipeline = Pipeline::from_config(&config, flags, &cli.cnn_path, &cli.ensemble_path, destination)?;

    match Dataset::from_mode(cli.mode()) {
        Some(dataset) => {
            let path = match dataset {
                Dataset::Validation => &config.datasets.validation,
                Dataset::Test => &config.datasets.test,
            };
            info!(dataset = dataset.as_str(), "Evaluating");
            pipeline.run_evaluation(dataset, path, cli.tolerance)?;
        }
        None => {
            let xml = cli
                .path
                .as_deref()
                .context("--path is required outside --validation/--test")?;
            let outcome = pipeline.run_production(xml)?;
            info!(
                mode = RunMode::Production.as_str(),
                scored = outcome.records.len(),
                output = %outcome.output.display(),
                "Done"
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bmcs=info,warn")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(BmcsError::EmptyEligibleSet) = e.downcast_ref::<BmcsError>() {
                error!("{e}");
                ExitCode::from(2)
            } else {
                error!("{e:#}");
                ExitCode::FAILURE
            }
        }
    }
}
