use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    ecs::{Registry, RegistryError, SystemCatalog, SystemContext, SystemId, SystemRegistration},
    headless::{FixedTimeStep, RecordingPresentation, ScriptedInput, SphereOverlapPhysics},
    services::{Input, Physics, Presentation, TimeSource},
};

pub struct EngineSettings {
    pub scenario_name: String,
    /// Seconds per tick for the default fixed time step.
    pub dt: f32,
}

/// Collects the registration list, the per-tick order and the collaborators.
/// Collaborators not supplied default to the headless implementations.
pub struct EngineBuilder {
    settings: EngineSettings,
    catalog: SystemCatalog,
    schedule: Vec<SystemId>,
    time: Option<Box<dyn TimeSource>>,
    physics: Box<dyn Physics>,
    presentation: Box<dyn Presentation>,
    input: Box<dyn Input>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            catalog: SystemCatalog::new(),
            schedule: Vec::new(),
            time: None,
            physics: Box::new(SphereOverlapPhysics::new()),
            presentation: Box::new(RecordingPresentation::new()),
            input: Box::new(ScriptedInput::default()),
        }
    }

    /// Registers a system and appends it to the tick order.
    pub fn with_system(mut self, registration: SystemRegistration) -> Self {
        self.push_system(registration);
        self
    }

    pub fn push_system(&mut self, registration: SystemRegistration) {
        self.schedule.push(registration.id());
        self.catalog.push(registration);
    }

    /// Registers a system without scheduling it.
    pub fn register(mut self, registration: SystemRegistration) -> Self {
        self.catalog.push(registration);
        self
    }

    /// Appends a system type to the tick order. Types that end up without a
    /// registration are skipped at dispatch time.
    pub fn schedule<T: 'static>(mut self) -> Self {
        self.schedule.push(SystemId::of::<T>());
        self
    }

    pub fn with_time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Some(Box::new(time));
        self
    }

    pub fn with_physics(mut self, physics: impl Physics + 'static) -> Self {
        self.physics = Box::new(physics);
        self
    }

    pub fn with_presentation(mut self, presentation: impl Presentation + 'static) -> Self {
        self.presentation = Box::new(presentation);
        self
    }

    pub fn with_input(mut self, input: impl Input + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn build(self) -> Result<Engine, RegistryError> {
        let registry = Registry::initialize(self.catalog)?;
        let time = self
            .time
            .unwrap_or_else(|| Box::new(FixedTimeStep(self.settings.dt)));
        Ok(Engine {
            registry,
            schedule: self.schedule,
            time,
            physics: self.physics,
            presentation: self.presentation,
            input: self.input,
            tick: 0,
            settings: self.settings,
        })
    }
}

/// The driver: runs the scheduled system types in order, once per tick.
pub struct Engine {
    registry: Registry,
    schedule: Vec<SystemId>,
    time: Box<dyn TimeSource>,
    physics: Box<dyn Physics>,
    presentation: Box<dyn Presentation>,
    input: Box<dyn Input>,
    tick: u64,
    settings: EngineSettings,
}

impl Engine {
    /// Gives setup code the registry together with the collaborators it
    /// needs to mint views and colliders for the initial entities.
    pub fn setup<R>(
        &mut self,
        f: impl FnOnce(&mut Registry, &mut dyn Presentation, &mut dyn Physics) -> R,
    ) -> R {
        f(
            &mut self.registry,
            self.presentation.as_mut(),
            self.physics.as_mut(),
        )
    }

    pub fn tick(&mut self) -> Result<TickSummary> {
        self.tick += 1;
        let tick = self.tick;
        let dt = self.time.delta();
        let input = self.input.sample(tick);
        let mut ctx = SystemContext {
            tick,
            dt,
            input,
            physics: self.physics.as_mut(),
            presentation: self.presentation.as_mut(),
        };

        let mut system_reports = Vec::with_capacity(self.schedule.len());
        for id in &self.schedule {
            let start = Instant::now();
            self.registry
                .execute_id(*id, &mut ctx)
                .with_context(|| format!("tick {tick} of '{}'", self.settings.scenario_name))?;
            system_reports.push(SystemRunReport {
                name: id.name(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        let entity_count = self.registry.entity_count();
        log::debug!("tick {tick} done, {entity_count} entities live");
        Ok(TickSummary {
            tick,
            dt,
            entity_count,
            system_reports,
        })
    }

    pub fn run(&mut self, ticks: u64) -> Result<()> {
        self.run_with_hook(ticks, |_| {})
    }

    pub fn run_with_hook(&mut self, ticks: u64, mut hook: impl FnMut(&TickSummary)) -> Result<()> {
        for _ in 0..ticks {
            let summary = self.tick()?;
            hook(&summary);
        }
        Ok(())
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn schedule(&self) -> &[SystemId] {
        &self.schedule
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SystemRunReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub dt: f32,
    pub entity_count: usize,
    pub system_reports: Vec<SystemRunReport>,
}
