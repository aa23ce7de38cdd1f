//! Entities stored in registries
//!
//! Every value a registry holds exposes a [`Base`] record (title, subtitle,
//! icon, kind and a [`Meta`] block with the derived path, actions and search
//! keywords) and decides for itself whether it should be hidden from search.
//!
//! Optional behaviour is expressed through a small, fixed set of capability
//! traits ([`Postable`], [`Deletable`]). An entity advertises a capability by
//! returning `Some(self)` from the matching `as_*` accessor; the registry's
//! action dispatcher matches on those accessors instead of probing types at
//! runtime.

pub mod base;
pub mod capability;
pub mod command;
pub mod kind;

pub use base::{Action, Base, Link, Meta, Relation};
pub use capability::{Deletable, Entity, Postable};
pub use command::{Command, CommandBus, Verb};
pub use kind::Kind;
