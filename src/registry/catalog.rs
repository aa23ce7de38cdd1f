//! Type-erased view of a registry
//!
//! The hub holds registries of many different key and entity types. The
//! parts of it that only need display records, paths, events or counters
//! (completion, details, search, stats, the aggregator) go through this
//! object-safe trait.

use super::store::{Registry, RegistryKey};
use crate::bus::{Event, EventBus};
use crate::entity::{Base, Entity};
use crate::stats::RegistryStats;

/// Read-only, key-agnostic registry interface
pub trait Catalog: Send + Sync {
    /// Basepath of the registry
    fn prefix(&self) -> String;

    /// `Base` snapshots of entities not omitted from search
    fn get_for_search(&self) -> Vec<Base>;

    /// Paths of every stored entity
    fn get_paths(&self) -> Vec<String>;

    /// The registry's change bus
    fn events(&self) -> &EventBus<Event>;

    /// Current counters
    fn stats(&self) -> RegistryStats;
}

impl<K: RegistryKey, V: Entity> Catalog for Registry<K, V> {
    fn prefix(&self) -> String {
        Registry::prefix(self)
    }

    fn get_for_search(&self) -> Vec<Base> {
        Registry::get_for_search(self)
    }

    fn get_paths(&self) -> Vec<String> {
        Registry::get_paths(self)
    }

    fn events(&self) -> &EventBus<Event> {
        Registry::events(self)
    }

    fn stats(&self) -> RegistryStats {
        RegistryStats {
            topic: Registry::prefix(self),
            entries: self.len(),
            events: Registry::events(self).stats(),
        }
    }
}
