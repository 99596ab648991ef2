use anyhow::Result;

use crate::{
    components::{MoveComponent, Translation},
    ecs::{Commands, Entity, EntitySystem, SystemContext},
};

pub struct MoveSystem;

impl MoveSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MoveSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitySystem for MoveSystem {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: &mut Entity,
        _commands: &mut Commands,
    ) -> Result<()> {
        let Some(movement) = entity.get::<MoveComponent>().copied() else {
            return Ok(());
        };
        if let Some(translation) = entity.get_mut::<Translation>() {
            translation.position += movement.direction * movement.speed * ctx.dt;
        }
        Ok(())
    }
}
