pub mod components;
pub mod ecs;
pub mod engine;
pub mod headless;
pub mod prefabs;
pub mod report;
pub mod scenario;
pub mod services;
pub mod systems;

pub use ecs::{Entity, EntityId, Registry};
pub use engine::{Engine, EngineBuilder, EngineSettings, TickSummary};
pub use report::RunReport;
pub use scenario::{Scenario, ScenarioLoader};
