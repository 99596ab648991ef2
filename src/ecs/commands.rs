//! Deferred structural changes.
//!
//! Systems never add or remove entities while they hold the entity set.
//! Instead they gather intents during their pass and record them here; the
//! registry applies the buffer, in recorded order, once the system returns.

use super::{Components, Entity, EntityId};

#[derive(Debug)]
pub enum Command {
    /// Register an entity that already carries an id.
    Add(Entity),
    /// Register a new entity with a freshly allocated id.
    Spawn(Components),
    Remove(EntityId),
}

#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) {
        self.queue.push(Command::Add(entity));
    }

    pub fn spawn(&mut self, components: Components) {
        self.queue.push(Command::Spawn(components));
    }

    pub fn remove(&mut self, id: EntityId) {
        self.queue.push(Command::Remove(id));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.queue.iter()
    }

    pub(crate) fn into_queue(self) -> Vec<Command> {
        self.queue
    }
}
