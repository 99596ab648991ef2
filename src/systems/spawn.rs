use anyhow::Result;

use crate::{
    components::{
        BulletOwner, BulletParams, BulletSpawnComponent, BulletSpawnRateComponent, Translation,
    },
    ecs::{BatchSystem, Commands, EntitySet, SystemContext},
    prefabs,
    services::{Placement, TemplateId},
};

struct PendingBullet {
    template: TemplateId,
    placement: Placement,
    owner: BulletOwner,
    params: BulletParams,
}

/// Honors at most one pending spawn request per spawner per tick, and with
/// a rate component at most one per cooldown interval. Bullets are created
/// after the sweep.
#[derive(Default)]
pub struct BulletSpawnSystem {
    spawned: u64,
}

impl BulletSpawnSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bullets created since startup.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

impl BatchSystem for BulletSpawnSystem {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entities: &mut EntitySet,
        commands: &mut Commands,
    ) -> Result<()> {
        let dt = ctx.dt;
        let mut pending = Vec::new();

        for entity in entities.iter_mut() {
            if !entity.has::<BulletSpawnComponent>() {
                continue;
            }

            if let Some(rate) = entity.get_mut::<BulletSpawnRateComponent>() {
                if rate.current_delay > 0.0 {
                    rate.current_delay -= dt;
                }
                if rate.current_delay > 0.0 {
                    continue;
                }
            }

            let placement = entity
                .get::<Translation>()
                .copied()
                .unwrap_or_default()
                .placement();
            let Some(spawner) = entity.get_mut::<BulletSpawnComponent>() else {
                continue;
            };
            if spawner.to_spawn == 0 {
                continue;
            }
            spawner.to_spawn -= 1;
            pending.push(PendingBullet {
                template: spawner.template.clone(),
                placement,
                owner: spawner.owner,
                params: spawner.bullet,
            });

            if let Some(rate) = entity.get_mut::<BulletSpawnRateComponent>() {
                rate.current_delay += rate.spawn_rate;
            }
        }

        for bullet in pending {
            let view = ctx.presentation.instantiate(&bullet.template, bullet.placement);
            commands.spawn(prefabs::bullet(
                view,
                bullet.placement,
                bullet.owner,
                bullet.params,
            ));
            self.spawned += 1;
        }
        Ok(())
    }
}
