//! Component storage keyed by component type

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Trait for components
pub trait Component: Send + Sync + 'static {}

/// Stable discriminant for a component type, usable where only a runtime
/// type token is available.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    id: TypeId,
    name: &'static str,
}

impl ComponentKey {
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(short_name(self.name))
    }
}

/// Strip the module path, keeping the last segment of a type name.
pub(crate) fn short_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// The set of components owned by one entity, at most one per type.
#[derive(Default)]
pub struct Components {
    data: HashMap<ComponentKey, Box<dyn Any + Send + Sync>>,
}

impl Components {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Builder form of `define`: attaches `T` (or reuses the attached one)
    /// and overwrites it with `value`.
    pub fn with<T: Component + Default>(mut self, value: T) -> Self {
        *self.define::<T>() = value;
        self
    }

    pub fn define<T: Component + Default>(&mut self) -> &mut T {
        self.data
            .entry(ComponentKey::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut::<T>()
            .expect("component slot holds the type of its key")
    }

    pub fn get<T: Component>(&self) -> Option<&T> {
        self.data.get(&ComponentKey::of::<T>())?.downcast_ref::<T>()
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.data
            .get_mut(&ComponentKey::of::<T>())?
            .downcast_mut::<T>()
    }

    pub fn has<T: Component>(&self) -> bool {
        self.has_key(ComponentKey::of::<T>())
    }

    pub fn has_key(&self, key: ComponentKey) -> bool {
        self.data.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.data.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.data.keys().map(|k| short_name(k.name)).collect();
        keys.sort_unstable();
        f.debug_set().entries(keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, Default, PartialEq)]
    struct Velocity {
        dx: f32,
    }
    impl Component for Velocity {}

    #[test]
    fn test_component_storage() {
        let mut components = Components::new();
        components.define::<Position>().x = 1.0;

        assert_eq!(components.len(), 1);
        assert!(components.has::<Position>());
        assert!(!components.has::<Velocity>());
        assert_eq!(components.get::<Position>(), Some(&Position { x: 1.0, y: 0.0 }));

        if let Some(pos) = components.get_mut::<Position>() {
            pos.y = 2.0;
        }
        assert_eq!(components.get::<Position>(), Some(&Position { x: 1.0, y: 2.0 }));
    }

    #[test]
    fn test_with_overwrites_single_slot() {
        let components = Components::new()
            .with(Velocity { dx: 1.0 })
            .with(Velocity { dx: 3.0 });

        assert_eq!(components.len(), 1);
        assert_eq!(components.get::<Velocity>(), Some(&Velocity { dx: 3.0 }));
    }

    #[test]
    fn test_key_debug_is_short() {
        let key = ComponentKey::of::<Position>();
        assert_eq!(format!("{key:?}"), "Position");
        assert!(key.name().ends_with("Position"));
    }
}
