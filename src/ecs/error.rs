use thiserror::Error;

use super::EntityId;

/// Lifecycle violations. These are caller bugs: they abort the operation
/// that raised them and leave the registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{0} is already registered")]
    DuplicateEntity(EntityId),
    #[error("{0} is not registered")]
    UnknownEntity(EntityId),
    #[error("system `{0}` is listed more than once")]
    DuplicateSystem(&'static str),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("system `{system}` failed")]
    System {
        system: &'static str,
        #[source]
        source: anyhow::Error,
    },
}
