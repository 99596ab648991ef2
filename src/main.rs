use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use skirmish::{
    engine::{EngineBuilder, EngineSettings},
    report::{RunReport, TickStats},
    scenario::ScenarioLoader,
    systems,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless skirmish simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/arena.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed driving the scripted input
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level.as_str())).init();

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let ticks = scenario.ticks(cli.ticks);
    let seed = cli.seed.unwrap_or(scenario.seed);

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        dt: scenario.dt,
    };
    let mut engine = systems::with_default_systems(EngineBuilder::new(settings))
        .with_input(scenario.random_input(seed))
        .build()?;

    let roster = engine.setup(|registry, presentation, physics| {
        scenario.populate(registry, presentation, physics)
    })?;
    log::info!(
        "running '{}' for {ticks} ticks with {} enemies",
        scenario.name,
        roster.enemies.len()
    );

    let mut stats = TickStats::default();
    engine.run_with_hook(ticks, |summary| stats.record(summary))?;

    let report = RunReport::collect(&engine, seed, &stats);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
