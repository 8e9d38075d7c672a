//! Command-line front end.

use std::error::Error;
use clap::Parser;
use log::LevelFilter;
use crate::decision_logger::{CompositeDecisionLogger, DecisionLogger, FileDecisionLogger, StdoutDecisionLogger};
use crate::orchestrator::{Orchestrator, RunSummary};
use crate::orchestrator_config::{ConfigOverrides, OrchestratorConfig};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Threshold-based auto scaling of a simulated instance pool.
#[derive(Debug, Parser)]
#[command(name = "cloud-orchestrator", version)]
pub struct Cli {
    /// YAML configuration file; built-in defaults are used when omitted.
    #[arg(long)]
    pub config: Option<String>,
    /// Number of orchestration cycles.
    #[arg(long)]
    pub iterations: Option<u64>,
    /// Seconds to wait between cycles.
    #[arg(long)]
    pub delay: Option<f64>,
    /// Seed for the random metric source.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the decision log of the run as JSON to this path.
    #[arg(long)]
    pub report: Option<String>,
    /// Only print warnings and errors.
    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet { LevelFilter::Warn } else { LevelFilter::Info }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            iterations: self.iterations,
            delay: self.delay,
            seed: self.seed,
        }
    }

    /// Loads the configuration file (or defaults) and applies the flags on top.
    pub fn load_config(&self) -> Result<OrchestratorConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => OrchestratorConfig::from_file(path)?,
            None => OrchestratorConfig::default(),
        };
        config.apply_overrides(&self.overrides())?;
        Ok(config)
    }
}

/// Runs the orchestrator as configured by `cli` and writes the report if requested.
pub fn run(cli: &Cli) -> Result<RunSummary, Box<dyn Error>> {
    let config = cli.load_config()?;

    let decision_logger: Box<dyn DecisionLogger> = if cli.report.is_some() {
        Box::new(CompositeDecisionLogger::new(vec![
            Box::new(StdoutDecisionLogger::new()),
            Box::new(FileDecisionLogger::new()),
        ]))
    } else {
        Box::new(StdoutDecisionLogger::new())
    };

    let mut orchestrator = Orchestrator::from_config(&config, decision_logger)?;
    let summary = orchestrator.run(config.iterations, config.delay_duration()?);
    if let Some(path) = &cli.report {
        orchestrator.finish(path)?;
    }
    Ok(summary)
}

pub fn exit_status<T, E>(result: &Result<T, E>) -> u8 {
    if result.is_ok() { EXIT_SUCCESS } else { EXIT_FAILURE }
}
