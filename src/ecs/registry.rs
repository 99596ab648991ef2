//! Registry - owner of the entity set and the instantiated systems

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use super::commands::Command;
use super::entity::EntityAllocator;
use super::system::SystemSlot;
use super::{
    Commands, Components, DispatchError, Entity, EntityId, RegistryError, SystemCatalog,
    SystemContext, SystemId,
};

/// The live entities of a registry, in insertion order.
///
/// Systems receive this view while they run. It lets them read and mutate
/// components but offers no way to add or remove entities; those go
/// through [`Commands`].
#[derive(Debug, Default)]
pub struct EntitySet {
    entities: Vec<Entity>,
    members: HashSet<EntityId>,
}

impl EntitySet {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if !self.contains(id) {
            return None;
        }
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if !self.contains(id) {
            return None;
        }
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(Entity::id).collect()
    }

    fn insert(&mut self, entity: Entity) -> Result<EntityId, RegistryError> {
        let id = entity.id();
        if !self.members.insert(id) {
            return Err(RegistryError::DuplicateEntity(id));
        }
        self.entities.push(entity);
        Ok(id)
    }

    fn remove(&mut self, id: EntityId) -> Result<Entity, RegistryError> {
        let index = self
            .entities
            .iter()
            .position(|entity| entity.id() == id)
            .ok_or(RegistryError::UnknownEntity(id))?;
        self.members.remove(&id);
        Ok(self.entities.remove(index))
    }
}

impl<'a> IntoIterator for &'a EntitySet {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut EntitySet {
    type Item = &'a mut Entity;
    type IntoIter = std::slice::IterMut<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

struct SystemEntry {
    id: SystemId,
    groups: Vec<TypeId>,
    slot: SystemSlot,
}

/// Owns the live entity set and exactly one instance of every registered
/// system type.
#[derive(Default)]
pub struct Registry {
    allocator: EntityAllocator,
    entities: EntitySet,
    systems: Vec<SystemEntry>,
    lookup: HashMap<TypeId, usize>,
}

impl Registry {
    /// Instantiates every system in `catalog` once, in catalog order, and
    /// starts with an empty entity set.
    pub fn initialize(catalog: SystemCatalog) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for registration in catalog.into_entries() {
            let id = registration.id();
            if registry.lookup.contains_key(&id.type_id()) {
                return Err(RegistryError::DuplicateSystem(id.name()));
            }
            let (id, groups, slot) = registration.instantiate();
            registry.lookup.insert(id.type_id(), registry.systems.len());
            registry.systems.push(SystemEntry { id, groups, slot });
        }
        log::debug!(
            "registry initialized with {} systems: {:?}",
            registry.systems.len(),
            registry.system_ids().collect::<Vec<_>>()
        );
        Ok(registry)
    }

    /// A fresh, unregistered entity with an id from this registry.
    pub fn create_entity(&mut self) -> Entity {
        Entity::new(self.allocator.allocate())
    }

    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId, RegistryError> {
        let id = self.entities.insert(entity)?;
        self.allocator.observe(id);
        log::debug!("added {id}");
        Ok(id)
    }

    /// Registers `components` under a freshly allocated id.
    pub fn spawn(&mut self, components: Components) -> Result<EntityId, RegistryError> {
        let id = self.allocator.allocate();
        self.add_entity(Entity::from_components(id, components))
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, RegistryError> {
        let entity = self.entities.remove(id)?;
        log::debug!("removed {id}");
        Ok(entity)
    }

    /// The live entity sequence.
    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    /// Mutable access for setup code outside of a dispatch. Structural
    /// changes still go through `add_entity` / `remove_entity`.
    pub fn entities_mut(&mut self) -> &mut EntitySet {
        &mut self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn system_ids(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.systems.iter().map(|entry| entry.id)
    }

    pub fn has_system<T: 'static>(&self) -> bool {
        self.lookup.contains_key(&TypeId::of::<T>())
    }

    pub fn system<T: 'static>(&self) -> Option<&T> {
        let index = *self.lookup.get(&TypeId::of::<T>())?;
        self.systems[index].slot.as_any().downcast_ref::<T>()
    }

    pub fn system_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let index = *self.lookup.get(&TypeId::of::<T>())?;
        self.systems[index].slot.as_any_mut().downcast_mut::<T>()
    }

    /// Runs the system of exactly type `T`. A type that was never registered
    /// is a no-op.
    pub fn execute<T: 'static>(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), DispatchError> {
        self.execute_id(SystemId::of::<T>(), ctx)
    }

    pub fn execute_id(
        &mut self,
        id: SystemId,
        ctx: &mut SystemContext<'_>,
    ) -> Result<(), DispatchError> {
        let Some(&index) = self.lookup.get(&id.type_id()) else {
            log::trace!("no system registered for {}, skipping", id.name());
            return Ok(());
        };
        self.dispatch(index, ctx)
    }

    /// Runs every system registered in group `G`, in registration order.
    /// Structural changes recorded by one system are applied before the next
    /// one runs.
    pub fn execute_all<G: 'static>(
        &mut self,
        ctx: &mut SystemContext<'_>,
    ) -> Result<(), DispatchError> {
        let group = TypeId::of::<G>();
        let matching: Vec<usize> = self
            .systems
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.groups.contains(&group))
            .map(|(index, _)| index)
            .collect();
        if matching.is_empty() {
            log::trace!("no systems in group {}", std::any::type_name::<G>());
        }
        for index in matching {
            self.dispatch(index, ctx)?;
        }
        Ok(())
    }

    /// Applies deferred structural changes in recorded order, stopping at the
    /// first lifecycle violation.
    pub fn apply(&mut self, commands: Commands) -> Result<(), RegistryError> {
        for command in commands.into_queue() {
            match command {
                Command::Add(entity) => {
                    self.add_entity(entity)?;
                }
                Command::Spawn(components) => {
                    self.spawn(components)?;
                }
                Command::Remove(id) => {
                    self.remove_entity(id)?;
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, index: usize, ctx: &mut SystemContext<'_>) -> Result<(), DispatchError> {
        let entry = &mut self.systems[index];
        let name = entry.id.name();
        log::trace!("tick {}: running {name} over {} entities", ctx.tick, self.entities.len());

        let mut commands = Commands::new();
        let outcome = match &mut entry.slot {
            SystemSlot::Batch(system) => system.execute(ctx, &mut self.entities, &mut commands),
            SystemSlot::PerEntity(system) => self
                .entities
                .iter_mut()
                .try_for_each(|entity| system.execute(ctx, entity, &mut commands)),
        };
        outcome.map_err(|source| DispatchError::System {
            system: name,
            source,
        })?;

        if !commands.is_empty() {
            log::trace!("{name} deferred {} structural changes", commands.len());
        }
        self.apply(commands)?;
        Ok(())
    }
}
