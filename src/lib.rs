//! Desktop session resource hub
//!
//! Collects state from many independent producers (compositor, notification
//! daemon, power subsystem, browser extensions, file watchers) into one
//! path-addressed resource space and serves it over HTTP with live change
//! notifications and ranked search.
//!
//! ```text
//!   producers ──put/replace──► Registry ──► EventBus ──► Aggregator ──► /watch
//!                                 │
//!                                 └──get_for_search──► SearchEngine ──► /search
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use deskhub::{HttpServer, Hub, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> deskhub::Result<()> {
//!     let config = ServerConfig::default();
//!     let hub = Arc::new(Hub::new(&config));
//!     HttpServer::new(config, hub).run().await
//! }
//! ```

pub mod bus;
pub mod desktop;
pub mod entity;
pub mod error;
pub mod logging;
pub mod registry;
pub mod search;
pub mod server;
pub mod stats;

pub use bus::{Aggregator, Event, EventBus, Subscription};
pub use desktop::Hub;
pub use entity::{Base, Command, Entity, Kind};
pub use error::{Error, Result};
pub use registry::{Registry, RegistryError};
pub use search::{Matcher, SearchEngine};
pub use server::{HttpServer, ServerConfig};
