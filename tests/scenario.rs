use std::fs;

use skirmish::{
    engine::{EngineBuilder, EngineSettings},
    report::{RunReport, TickStats},
    scenario::ScenarioLoader,
    systems,
};
use tempfile::tempdir;

const SCENARIO: &str = "
name: hook-test
seed: 9
dt: 0.25
ticks: 40
player:
  fire_cooldown: 0.5
enemies:
  - position: [0, 0, 6]
  - position: [4, 0, 4]
    radius: 1.0
input:
  fire_probability: 1.0
  jitter: 0.0
";

#[test]
fn engine_runs_hook_each_tick() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("hook.yaml"), SCENARIO).expect("write scenario");

    let scenario = ScenarioLoader::new(dir.path())
        .load("hook.yaml")
        .expect("scenario should load");
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        dt: scenario.dt,
    };
    let mut engine = systems::with_default_systems(EngineBuilder::new(settings))
        .with_input(scenario.random_input(scenario.seed))
        .build()
        .expect("engine builds");
    let roster = engine
        .setup(|registry, presentation, physics| scenario.populate(registry, presentation, physics))
        .expect("populate");
    assert_eq!(roster.enemies.len(), 2);

    let ticks = scenario.ticks(None);
    let mut seen = Vec::new();
    let mut stats = TickStats::default();
    engine
        .run_with_hook(ticks, |summary| {
            seen.push(summary.tick);
            stats.record(summary);
        })
        .expect("run succeeds");

    assert_eq!(seen.len(), 40);
    assert_eq!(seen.first().copied(), Some(1));
    assert_eq!(seen.last().copied(), Some(40));

    let report = RunReport::collect(&engine, scenario.seed, &stats);
    assert_eq!(report.ticks, 40);
    assert_eq!(report.players, 1);
    // Fire is held every tick; the cooldown admits a shot every other tick.
    assert_eq!(report.bullets_spawned, 20);
    assert_eq!(
        report.entity_count,
        report.players + report.bullets + report.others
    );

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["scenario"], "hook-test");
}

#[test]
fn missing_scenario_reports_path() {
    let dir = tempdir().expect("tempdir");
    let err = ScenarioLoader::new(dir.path())
        .load("absent.yaml")
        .unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn bundled_arena_scenario_parses() {
    let scenario = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load("scenarios/arena.yaml")
        .expect("arena loads");
    assert_eq!(scenario.name, "arena");
    assert!(!scenario.enemies.is_empty());
}
