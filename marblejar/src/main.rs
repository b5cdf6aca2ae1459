use marblejar::{bench_step, bench_step_curve};
use marblejar::{BodySnapshot, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window for at most this many ticks, then print the
    /// marbles as JSON
    #[arg(long)]
    headless: Option<u64>,

    /// Give the current user this many new marbles before running
    #[arg(long, default_value_t = 0)]
    drops: u32,

    /// Override the spawn seed from the scenario
    #[arg(long)]
    seed: Option<u64>,

    /// Time the step function instead of running a scenario
    #[arg(long)]
    bench: bool,

    /// With --bench, print a CSV curve instead of the summary table
    #[arg(long)]
    curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn run_headless(mut scenario: Scenario, max_ticks: u64) -> Result<()> {
    let mut ticks = 0;
    while ticks < max_ticks {
        let busy = scenario
            .shelf
            .jars()
            .any(|(_, jar)| jar.pending() > 0 || !jar.sim().all_settled());
        if !busy {
            break;
        }
        scenario.shelf.tick()?;
        ticks += 1;
    }
    info!(ticks, "headless run finished");

    let marbles: BTreeMap<&str, Vec<BodySnapshot>> = scenario
        .shelf
        .jars()
        .map(|(owner, jar)| (owner, jar.sim().snapshot()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&marbles)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_step_curve()?;
        } else {
            bench_step()?;
        }
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(seed) = args.seed {
        scenario_cfg.parameters.seed = seed;
    }

    let mut scenario = Scenario::build_scenario(scenario_cfg.clone())?;
    info!(jars = scenario.shelf.len(), file = %args.file_name, "scenario loaded");

    if args.drops > 0 {
        let user = scenario
            .shelf
            .current_user()
            .map(str::to_string)
            .context("--drops needs current_user in the scenario")?;
        let mut counts = scenario_cfg.owners;
        *counts.entry(user).or_insert(0) += args.drops;
        scenario.shelf.sync(&counts)?;
    }

    match args.headless {
        Some(max_ticks) => run_headless(scenario, max_ticks),
        None => run_viewer(scenario),
    }
}

#[cfg(feature = "viewer")]
fn run_viewer(scenario: Scenario) -> Result<()> {
    marblejar::run_2d(scenario);
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_viewer(_scenario: Scenario) -> Result<()> {
    anyhow::bail!("built without the `viewer` feature, use --headless <ticks>")
}
