//! scrubber-replay - run a section scrubber scenario headlessly
//!
//! Prints the step transcript and exits non-zero if an assertion fails.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use scrubber_replay::{Scenario, ScenarioRunner};

/// Replay a section scrubber scenario and print its transcript
#[derive(Parser, Debug)]
#[command(name = "scrubber-replay")]
#[command(about = "Replay a section scrubber scenario headlessly")]
#[command(version)]
struct Args {
    /// Scenario file (.json or .toml)
    scenario: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Scrubber config (.toml) overriding the scenario's own
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut scenario = Scenario::from_path(&args.scenario)
        .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?;

    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        scenario.config = scrubber_core::ScrubberConfig::from_toml_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::info!(config = %path.display(), "using config override");
    }

    let report = ScenarioRunner::run_scenario(&scenario).context("Failed to start scenario")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Some(failure) = &report.failure {
        bail!("assertion failed at step {}: {}", failure.step, failure.message);
    }
    Ok(())
}
