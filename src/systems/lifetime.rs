use anyhow::Result;

use crate::{
    components::LifeTimeComponent,
    ecs::{BatchSystem, Commands, EntitySet, SystemContext},
};

/// Counts down remaining lifetimes; expired entities are collected during
/// the sweep and removed, view first, once it is over.
#[derive(Default)]
pub struct LifeTimeSystem {
    expired: u64,
}

impl LifeTimeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expired(&self) -> u64 {
        self.expired
    }
}

impl BatchSystem for LifeTimeSystem {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entities: &mut EntitySet,
        commands: &mut Commands,
    ) -> Result<()> {
        let dt = ctx.dt;
        let mut expired = Vec::new();

        for entity in entities.iter_mut() {
            let id = entity.id();
            let Some(life) = entity.get_mut::<LifeTimeComponent>() else {
                continue;
            };
            if life.remaining > 0.0 {
                life.remaining -= dt;
            }
            if life.remaining <= 0.0 {
                expired.push((id, life.view));
            }
        }

        for (id, view) in expired {
            if let Some(view) = view {
                ctx.presentation.destroy(view);
            }
            commands.remove(id);
            self.expired += 1;
        }
        Ok(())
    }
}
