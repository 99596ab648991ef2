//! System contract and the explicit registration list.
//!
//! A system comes in one of two shapes. A [`BatchSystem`] receives the whole
//! live entity set once per dispatch and does its own iteration and
//! filtering. An [`EntitySystem`] is invoked once per live entity, in
//! entity-set order. Both record structural changes into [`Commands`]
//! instead of touching the set directly.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use anyhow::Result;

use super::component::short_name;
use super::{Commands, Entity, EntitySet};
use crate::services::{InputState, Physics, Presentation};

/// Per-dispatch inputs handed to every system.
pub struct SystemContext<'a> {
    pub tick: u64,
    /// Elapsed time for this tick, from the driver's time source.
    pub dt: f32,
    pub input: InputState,
    pub physics: &'a mut dyn Physics,
    pub presentation: &'a mut dyn Presentation,
}

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub trait BatchSystem: AsAny {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entities: &mut EntitySet,
        commands: &mut Commands,
    ) -> Result<()>;
}

pub trait EntitySystem: AsAny {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: &mut Entity,
        commands: &mut Commands,
    ) -> Result<()>;
}

/// Identity of a concrete system type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId {
    type_id: TypeId,
    name: &'static str,
}

impl SystemId {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: short_name(type_name::<T>()),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) enum SystemSlot {
    Batch(Box<dyn BatchSystem>),
    PerEntity(Box<dyn EntitySystem>),
}

impl SystemSlot {
    pub(crate) fn as_any(&self) -> &dyn Any {
        match self {
            SystemSlot::Batch(system) => {
                let system: &dyn BatchSystem = &**system;
                system.as_any()
            }
            SystemSlot::PerEntity(system) => {
                let system: &dyn EntitySystem = &**system;
                system.as_any()
            }
        }
    }

    pub(crate) fn as_any_mut(&mut self) -> &mut dyn Any {
        match self {
            SystemSlot::Batch(system) => {
                let system: &mut dyn BatchSystem = &mut **system;
                system.as_any_mut()
            }
            SystemSlot::PerEntity(system) => {
                let system: &mut dyn EntitySystem = &mut **system;
                system.as_any_mut()
            }
        }
    }
}

/// One entry of the registration list: a system type, its factory and the
/// groups it answers to in grouped dispatch.
pub struct SystemRegistration {
    id: SystemId,
    groups: Vec<TypeId>,
    factory: Box<dyn FnOnce() -> SystemSlot>,
}

impl SystemRegistration {
    pub fn batch<T: BatchSystem + Default>() -> Self {
        Self::batch_with(T::default)
    }

    pub fn batch_with<T: BatchSystem>(factory: impl FnOnce() -> T + 'static) -> Self {
        Self {
            id: SystemId::of::<T>(),
            groups: Vec::new(),
            factory: Box::new(move || SystemSlot::Batch(Box::new(factory()))),
        }
    }

    pub fn per_entity<T: EntitySystem + Default>() -> Self {
        Self::per_entity_with(T::default)
    }

    pub fn per_entity_with<T: EntitySystem>(factory: impl FnOnce() -> T + 'static) -> Self {
        Self {
            id: SystemId::of::<T>(),
            groups: Vec::new(),
            factory: Box::new(move || SystemSlot::PerEntity(Box::new(factory()))),
        }
    }

    /// Tags the system with the marker type `G` for `Registry::execute_all`.
    pub fn in_group<G: 'static>(mut self) -> Self {
        let group = TypeId::of::<G>();
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
        self
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    pub(crate) fn instantiate(self) -> (SystemId, Vec<TypeId>, SystemSlot) {
        (self.id, self.groups, (self.factory)())
    }
}

/// The explicit, ordered list of system types a registry instantiates.
#[derive(Default)]
pub struct SystemCatalog {
    entries: Vec<SystemRegistration>,
}

impl SystemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, registration: SystemRegistration) -> Self {
        self.push(registration);
        self
    }

    pub fn push(&mut self, registration: SystemRegistration) {
        self.entries.push(registration);
    }

    pub fn batch<T: BatchSystem + Default>(self) -> Self {
        self.register(SystemRegistration::batch::<T>())
    }

    pub fn per_entity<T: EntitySystem + Default>(self) -> Self {
        self.register(SystemRegistration::per_entity::<T>())
    }

    pub fn ids(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.entries.iter().map(SystemRegistration::id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<SystemRegistration> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Noop;

    impl BatchSystem for Noop {
        fn execute(
            &mut self,
            _ctx: &mut SystemContext<'_>,
            _entities: &mut EntitySet,
            _commands: &mut Commands,
        ) -> Result<()> {
            Ok(())
        }
    }

    struct Physical;

    #[test]
    fn system_id_uses_short_name() {
        assert_eq!(SystemId::of::<Noop>().name(), "Noop");
        assert_eq!(SystemId::of::<Noop>(), SystemRegistration::batch::<Noop>().id());
    }

    #[test]
    fn slot_downcasts_to_concrete_type() {
        let (_, groups, slot) = SystemRegistration::batch::<Noop>()
            .in_group::<Physical>()
            .in_group::<Physical>()
            .instantiate();
        assert_eq!(groups, vec![TypeId::of::<Physical>()]);
        assert!(slot.as_any().downcast_ref::<Noop>().is_some());
    }

    #[test]
    fn catalog_keeps_registration_order() {
        struct Other;
        impl EntitySystem for Other {
            fn execute(
                &mut self,
                _ctx: &mut SystemContext<'_>,
                _entity: &mut Entity,
                _commands: &mut Commands,
            ) -> Result<()> {
                Ok(())
            }
        }

        let catalog = SystemCatalog::new()
            .register(SystemRegistration::per_entity_with(|| Other))
            .batch::<Noop>();
        let names: Vec<_> = catalog.ids().map(|id| id.name()).collect();
        assert_eq!(names, vec!["Other", "Noop"]);
    }
}
