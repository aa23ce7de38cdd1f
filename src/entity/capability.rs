//! Entity trait and optional capabilities

use serde::Serialize;

use super::base::Base;
use crate::registry::RegistryError;

/// A value that can be stored in a [`Registry`](crate::registry::Registry)
///
/// Entities are replaced wholesale, never mutated in place while
/// registered; the registry only touches `base_mut().meta.path`.
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    /// Shared display record
    fn base(&self) -> &Base;

    /// Mutable access used by the registry to stamp the path
    fn base_mut(&mut self) -> &mut Base;

    /// Whether the entity should be left out of search results
    fn omit_from_search(&self) -> bool {
        false
    }

    /// Post capability, if any
    fn as_postable(&self) -> Option<&dyn Postable> {
        None
    }

    /// Delete capability, if any
    fn as_deletable(&self) -> Option<&dyn Deletable> {
        None
    }
}

/// Entities whose actions can be invoked
pub trait Postable {
    /// Invoke the action with the given id ("" is the default action)
    fn post(&self, action: &str) -> Result<(), RegistryError>;
}

/// Entities that can be dismissed or closed
pub trait Deletable {
    fn delete(&self) -> Result<(), RegistryError>;
}
