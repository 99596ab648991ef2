//! Entity handles and the per-entity component bag

use std::fmt;

use super::component::{Component, ComponentKey, Components};

/// Opaque entity handle, unique for its lifetime within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Hands out entity ids. Ids are never reused, and ids seen on entities
/// added from elsewhere are skipped so a later allocation cannot collide.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn observe(&mut self, id: EntityId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }

    pub fn issued(&self) -> u64 {
        self.next_id
    }
}

/// An identity plus at most one component of each type.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    components: Components,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self::from_components(id, Components::new())
    }

    pub fn from_components(id: EntityId, components: Components) -> Self {
        Self { id, components }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the attached `T`, attaching a default one first if absent.
    pub fn define<T: Component + Default>(&mut self) -> &mut T {
        self.components.define::<T>()
    }

    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components.get::<T>()
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.get_mut::<T>()
    }

    pub fn has<T: Component>(&self) -> bool {
        self.components.has::<T>()
    }

    pub fn has_key(&self, key: ComponentKey) -> bool {
        self.components.has_key(key)
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn into_components(self) -> Components {
        self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Health {
        hp: i32,
    }
    impl Component for Health {}

    #[derive(Debug, Default)]
    struct Armor;
    impl Component for Armor {}

    #[test]
    fn test_entity_allocation() {
        let mut allocator = EntityAllocator::new();

        let e1 = allocator.allocate();
        let e2 = allocator.allocate();
        assert_eq!(e1.raw(), 0);
        assert_eq!(e2.raw(), 1);
        assert_eq!(allocator.issued(), 2);
    }

    #[test]
    fn test_observed_ids_are_skipped() {
        let mut allocator = EntityAllocator::new();
        allocator.observe(EntityId(41));
        assert_eq!(allocator.allocate().raw(), 42);

        // Observing an older id never rewinds.
        allocator.observe(EntityId(3));
        assert_eq!(allocator.allocate().raw(), 43);
    }

    #[test]
    fn test_define_is_idempotent() {
        let mut entity = Entity::new(EntityId(0));
        entity.define::<Health>().hp = 10;

        let first: *const Health = entity.define::<Health>();
        let second: *const Health = entity.define::<Health>();
        assert!(std::ptr::eq(first, second));
        assert_eq!(entity.get::<Health>(), Some(&Health { hp: 10 }));
        assert_eq!(entity.components().len(), 1);
    }

    #[test]
    fn test_absent_component() {
        let mut entity = Entity::new(EntityId(0));
        entity.define::<Health>();

        assert!(entity.get::<Armor>().is_none());
        assert!(!entity.has::<Armor>());
        assert!(!entity.has_key(ComponentKey::of::<Armor>()));
        assert!(entity.has_key(ComponentKey::of::<Health>()));
        // get never constructs
        assert_eq!(entity.components().len(), 1);
    }
}
