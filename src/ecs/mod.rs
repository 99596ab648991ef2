//! Entity Component System (ECS) runtime
//!
//! Entities carry at most one component per type. The [`Registry`] owns the
//! live entity set and one instance of every registered system, and
//! dispatches systems on request. Structural changes requested by a system
//! are deferred through [`Commands`] and applied after it returns.

pub mod commands;
pub mod component;
pub mod entity;
pub mod error;
pub mod registry;
pub mod system;

pub use commands::{Command, Commands};
pub use component::{Component, ComponentKey, Components};
pub use entity::{Entity, EntityId};
pub use error::{DispatchError, RegistryError};
pub use registry::{EntitySet, Registry};
pub use system::{
    BatchSystem, EntitySystem, SystemCatalog, SystemContext, SystemId, SystemRegistration,
};
