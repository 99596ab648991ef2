use std::collections::HashSet;

use anyhow::Result;

use crate::{
    components::{
        CollideComponent, CollideableComponent, KillableComponent, TagBullet, Translation,
    },
    ecs::{BatchSystem, Commands, Entity, EntityId, EntitySet, EntitySystem, SystemContext},
};

/// Refreshes each collider-bearing entity's overlap list from the physics
/// collaborator.
pub struct CollideSystem;

impl CollideSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CollideSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitySystem for CollideSystem {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: &mut Entity,
        _commands: &mut Commands,
    ) -> Result<()> {
        let Some(radius) = entity.get::<CollideComponent>().map(|c| c.radius) else {
            return Ok(());
        };
        let Some(position) = entity.get::<Translation>().map(|t| t.position) else {
            return Ok(());
        };
        let hits = ctx.physics.overlap_sphere(position, radius);
        if let Some(collide) = entity.get_mut::<CollideComponent>() {
            collide.collisions = hits;
        }
        Ok(())
    }
}

/// Matches bullet overlaps against every other entity's collider. A bullet
/// that hits something is queued for removal together with the target when
/// the target is killable; the queue is resolved after the sweep.
#[derive(Default)]
pub struct BulletKillSystem {
    kills: u64,
}

impl BulletKillSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities removed by this system since startup.
    pub fn kills(&self) -> u64 {
        self.kills
    }
}

impl BatchSystem for BulletKillSystem {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entities: &mut EntitySet,
        commands: &mut Commands,
    ) -> Result<()> {
        let mut doomed: Vec<EntityId> = Vec::new();
        let mut queued: HashSet<EntityId> = HashSet::new();
        let mut queue = |id: EntityId| {
            if queued.insert(id) {
                doomed.push(id);
            }
        };

        for bullet in entities.iter() {
            if !bullet.has::<TagBullet>() {
                continue;
            }
            let Some(collide) = bullet.get::<CollideComponent>() else {
                continue;
            };
            if collide.collisions.is_empty() {
                continue;
            }

            for target in entities.iter() {
                if target.id() == bullet.id() {
                    continue;
                }
                let Some(collider) = target
                    .get::<CollideableComponent>()
                    .and_then(|c| c.collider)
                else {
                    continue;
                };
                if collide.collisions.contains(&collider) {
                    if target.has::<KillableComponent>() {
                        queue(target.id());
                    }
                    queue(bullet.id());
                }
            }
        }

        for id in doomed {
            if let Some(entity) = entities.get(id) {
                if let Some(view) = entity.get::<KillableComponent>().and_then(|k| k.view) {
                    ctx.presentation.destroy(view);
                }
                if let Some(collider) = entity
                    .get::<CollideableComponent>()
                    .and_then(|c| c.collider)
                {
                    ctx.physics.remove(collider);
                }
            }
            commands.remove(id);
            self.kills += 1;
        }
        Ok(())
    }
}
