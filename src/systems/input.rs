use anyhow::Result;
use glam::Vec3;

use crate::{
    components::{BulletSpawnComponent, MoveComponent, TagPlayer},
    ecs::{Commands, Entity, EntitySystem, SystemContext},
};

/// Steers the player from the stick and queues a shot per fire press.
pub struct PlayerInputSystem;

impl PlayerInputSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlayerInputSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitySystem for PlayerInputSystem {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: &mut Entity,
        _commands: &mut Commands,
    ) -> Result<()> {
        if !entity.has::<TagPlayer>() {
            return Ok(());
        }
        let input = ctx.input;
        if let Some(movement) = entity.get_mut::<MoveComponent>() {
            movement.direction = Vec3::new(input.axes.x, 0.0, input.axes.y);
        }
        if input.fire_pressed {
            if let Some(spawner) = entity.get_mut::<BulletSpawnComponent>() {
                spawner.to_spawn += 1;
            }
        }
        Ok(())
    }
}
