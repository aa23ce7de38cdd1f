//! Change notification bus
//!
//! Every registry owns an [`EventBus`] and publishes one [`Event`] per
//! mutation. Subscribers hold independent cursors into an append-only chain
//! of nodes; a publisher never waits for them.
//!
//! # Architecture
//!
//! ```text
//!   Registry A ──publish──► EventBus A ──┐
//!   Registry B ──publish──► EventBus B ──┼──► Aggregator (one relay task per source)
//!   Registry C ──publish──► EventBus C ──┘            │
//!                                                     ▼
//!                                          aggregate EventBus
//!                                          │        │        │
//!                                          ▼        ▼        ▼
//!                                       /watch   /watch   /watch
//! ```
//!
//! # Memory
//!
//! The bus keeps only the tail node. Older nodes stay alive exactly as long
//! as some subscription still points at or behind them, so retained memory
//! follows the lag of the slowest live subscriber, not the publish rate.

pub mod aggregator;
pub mod chain;
pub mod event;

pub use aggregator::Aggregator;
pub use chain::{BusStats, EventBus, Subscription};
pub use event::Event;
