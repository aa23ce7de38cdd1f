//! Resource registries
//!
//! A [`Registry`] holds exactly one current entity per key, makes it
//! addressable as `basepath + key`, and announces every mutation on its own
//! [`EventBus`](crate::bus::EventBus).
//!
//! # Architecture
//!
//! ```text
//!                        Arc<Registry<K, V>>
//!                   ┌──────────────────────────┐
//!   producers ────► │ Mutex<{                  │
//!   put/remove/     │   entries: HashMap<K,V>, │
//!   replace         │   basepath,              │
//!                   │ }>                       │
//!                   │ events: EventBus<Event>  │──► Aggregator ──► /watch
//!                   └────────────┬─────────────┘
//!                                │ snapshots
//!              ┌─────────────────┼──────────────────┐
//!              ▼                 ▼                  ▼
//!        HTTP get/list    get_for_search()    post()/delete()
//!                          (SearchEngine)     (capabilities)
//! ```
//!
//! Every operation runs under one exclusive lock and reads return owned
//! snapshots, so a reader never observes a half-applied `replace`.

pub mod catalog;
pub mod error;
pub mod store;

pub use catalog::Catalog;
pub use error::RegistryError;
pub use store::{Registry, RegistryKey};
