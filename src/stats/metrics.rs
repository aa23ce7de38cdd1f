//! Statistics for registries and the hub

use std::time::Duration;

use serde::Serialize;

use crate::bus::BusStats;

/// Registry-level statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Registry basepath
    pub topic: String,
    /// Number of stored entities
    pub entries: usize,
    /// Counters of the registry's change bus
    pub events: BusStats,
}

/// Hub-wide statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubStats {
    /// Seconds since the hub was built
    pub uptime_secs: u64,
    /// One entry per registry, in construction order
    pub registries: Vec<RegistryStats>,
    /// Counters of the aggregate bus; `subscribers` is the number of
    /// connected watchers
    pub aggregate: BusStats,
}

impl HubStats {
    pub fn new(uptime: Duration, registries: Vec<RegistryStats>, aggregate: BusStats) -> Self {
        Self {
            uptime_secs: uptime.as_secs(),
            registries,
            aggregate,
        }
    }

    /// Total entities across all registries
    pub fn total_entries(&self) -> usize {
        self.registries.iter().map(|r| r.entries).sum()
    }

    /// Total events published across all registries
    pub fn total_published(&self) -> u64 {
        self.registries.iter().map(|r| r.events.published).sum()
    }

    /// Statistics of the registry with the given basepath
    pub fn registry(&self, topic: &str) -> Option<&RegistryStats> {
        self.registries.iter().find(|r| r.topic == topic)
    }
}
