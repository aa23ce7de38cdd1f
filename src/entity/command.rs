//! Commands sent from capabilities to producers
//!
//! Entities do not talk to the window manager, the notification daemon or a
//! browser themselves. Invoking a capability publishes a [`Command`] on the
//! hub's command bus; the bridge that owns the entity subscribes and acts.

use serde::Serialize;

use crate::bus::EventBus;
use crate::registry::RegistryError;

use super::base::Base;

/// What was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Invoke an action
    Post,
    /// Close or dismiss
    Delete,
}

/// A request addressed to the producer of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Path of the target entity
    pub path: String,
    pub verb: Verb,
    /// Action id (empty for delete and for default actions)
    pub action: String,
}

impl Command {
    /// Create a post command
    pub fn post(path: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb: Verb::Post,
            action: action.into(),
        }
    }

    /// Create a delete command
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb: Verb::Delete,
            action: String::new(),
        }
    }
}

/// Broadcast channel carrying commands to producers
pub type CommandBus = EventBus<Command>;

/// Publish a post command for `base`, rejecting unknown action ids
///
/// An action id is accepted if it is the empty (default) id or one of the
/// entity's listed actions.
pub(crate) fn post_listed(
    commands: &CommandBus,
    base: &Base,
    action: &str,
) -> Result<(), RegistryError> {
    if !action.is_empty() && base.action(action).is_none() {
        return Err(RegistryError::UnknownAction {
            path: base.meta.path.clone(),
            action: action.to_string(),
        });
    }
    commands.publish(Command::post(base.meta.path.clone(), action));
    Ok(())
}

/// Publish a post command for the default action only
pub(crate) fn post_default(
    commands: &CommandBus,
    base: &Base,
    action: &str,
) -> Result<(), RegistryError> {
    if !action.is_empty() {
        return Err(RegistryError::UnknownAction {
            path: base.meta.path.clone(),
            action: action.to_string(),
        });
    }
    commands.publish(Command::post(base.meta.path.clone(), ""));
    Ok(())
}

/// Publish a delete command for `base`
pub(crate) fn delete(commands: &CommandBus, base: &Base) -> Result<(), RegistryError> {
    commands.publish(Command::delete(base.meta.path.clone()));
    Ok(())
}
