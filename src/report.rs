use std::fmt;

use serde::Serialize;

use crate::{
    components::{TagBullet, TagPlayer},
    ecs::Registry,
    engine::{Engine, TickSummary},
    systems::{BulletKillSystem, BulletSpawnSystem, LifeTimeSystem},
};

/// End-of-run digest of a simulation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub seed: u64,
    pub ticks: u64,
    pub entity_count: usize,
    pub players: usize,
    pub bullets: usize,
    pub others: usize,
    pub bullets_spawned: u64,
    pub kills: u64,
    pub expired: u64,
    pub mean_tick_ms: f64,
}

/// Accumulates per-tick timings while the engine runs.
#[derive(Debug, Default)]
pub struct TickStats {
    ticks: u64,
    total_ms: f64,
}

impl TickStats {
    pub fn record(&mut self, summary: &TickSummary) {
        self.ticks += 1;
        self.total_ms += summary
            .system_reports
            .iter()
            .map(|report| report.duration_ms)
            .sum::<f64>();
    }

    pub fn mean_ms(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.total_ms / self.ticks as f64
        }
    }
}

impl RunReport {
    pub fn collect(engine: &Engine, seed: u64, stats: &TickStats) -> Self {
        let registry = engine.registry();
        let (players, bullets) = census(registry);
        let entity_count = registry.entity_count();
        Self {
            scenario: engine.scenario_name().to_string(),
            seed,
            ticks: engine.current_tick(),
            entity_count,
            players,
            bullets,
            others: entity_count - players - bullets,
            bullets_spawned: registry
                .system::<BulletSpawnSystem>()
                .map_or(0, BulletSpawnSystem::spawned),
            kills: registry
                .system::<BulletKillSystem>()
                .map_or(0, BulletKillSystem::kills),
            expired: registry
                .system::<LifeTimeSystem>()
                .map_or(0, LifeTimeSystem::expired),
            mean_tick_ms: stats.mean_ms(),
        }
    }
}

fn census(registry: &Registry) -> (usize, usize) {
    registry
        .entities()
        .iter()
        .fold((0, 0), |(players, bullets), entity| {
            (
                players + usize::from(entity.has::<TagPlayer>()),
                bullets + usize::from(entity.has::<TagBullet>()),
            )
        })
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scenario '{}' (seed {}) completed for {} ticks.",
            self.scenario, self.seed, self.ticks
        )?;
        writeln!(
            f,
            "Live entities: {} ({} players, {} bullets, {} other)",
            self.entity_count, self.players, self.bullets, self.others
        )?;
        writeln!(
            f,
            "Bullets spawned: {}, kills: {}, expired: {}",
            self.bullets_spawned, self.kills, self.expired
        )?;
        write!(f, "Mean tick: {:.3} ms", self.mean_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SystemRunReport;

    #[test]
    fn mean_of_no_ticks_is_zero() {
        assert_eq!(TickStats::default().mean_ms(), 0.0);
    }

    #[test]
    fn mean_sums_system_durations_per_tick() {
        let mut stats = TickStats::default();
        for tick in 1..=2 {
            stats.record(&TickSummary {
                tick,
                dt: 1.0,
                entity_count: 0,
                system_reports: vec![
                    SystemRunReport {
                        name: "A",
                        duration_ms: 1.0,
                    },
                    SystemRunReport {
                        name: "B",
                        duration_ms: 2.0 * tick as f64,
                    },
                ],
            });
        }
        // (1 + 2) and (1 + 4) averaged
        assert_eq!(stats.mean_ms(), 4.0);
    }
}
