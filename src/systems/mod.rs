mod collision;
mod input;
mod lifetime;
mod movement;
mod spawn;
mod view_sync;

pub use collision::{BulletKillSystem, CollideSystem};
pub use input::PlayerInputSystem;
pub use lifetime::LifeTimeSystem;
pub use movement::MoveSystem;
pub use spawn::BulletSpawnSystem;
pub use view_sync::ViewSyncSystem;

use crate::{ecs::SystemRegistration, engine::EngineBuilder};

/// Group of the systems that advance game state.
pub struct Gameplay;

/// Group of the systems that only forward state to the presentation layer.
pub struct Visuals;

/// The game's systems, in the order they run each tick.
pub fn registrations() -> Vec<SystemRegistration> {
    vec![
        SystemRegistration::per_entity::<PlayerInputSystem>().in_group::<Gameplay>(),
        SystemRegistration::per_entity::<MoveSystem>().in_group::<Gameplay>(),
        SystemRegistration::batch::<BulletSpawnSystem>().in_group::<Gameplay>(),
        SystemRegistration::per_entity::<CollideSystem>().in_group::<Gameplay>(),
        SystemRegistration::batch::<BulletKillSystem>().in_group::<Gameplay>(),
        SystemRegistration::batch::<LifeTimeSystem>().in_group::<Gameplay>(),
        SystemRegistration::per_entity::<ViewSyncSystem>().in_group::<Visuals>(),
    ]
}

pub fn with_default_systems(mut builder: EngineBuilder) -> EngineBuilder {
    for registration in registrations() {
        builder.push_system(registration);
    }
    builder
}
