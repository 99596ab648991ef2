use anyhow::Result;

use crate::{
    components::Translation,
    ecs::{Commands, Entity, EntitySystem, SystemContext},
};

/// Mirrors simulated placements onto their views.
pub struct ViewSyncSystem;

impl ViewSyncSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ViewSyncSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitySystem for ViewSyncSystem {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: &mut Entity,
        _commands: &mut Commands,
    ) -> Result<()> {
        if let Some(translation) = entity.get::<Translation>() {
            if let Some(view) = translation.view {
                ctx.presentation.place(view, translation.placement());
            }
        }
        Ok(())
    }
}
