//! Runtime statistics
//!
//! Plain snapshots assembled on demand from registry and bus counters;
//! nothing here is updated on the hot path.

pub mod metrics;

pub use metrics::{HubStats, RegistryStats};
