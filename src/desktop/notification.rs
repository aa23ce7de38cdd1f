//! Desktop notifications

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::entity::command;
use crate::entity::{Base, CommandBus, Deletable, Entity, Kind, Postable};
use crate::registry::RegistryError;

/// Action id the notification protocol reserves for "activate"
pub const DEFAULT_ACTION: &str = "default";

/// Notification urgency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    /// How long a notification without a default action stays searchable
    pub fn soft_expiry(&self) -> Option<Duration> {
        match self {
            Urgency::Low => Some(Duration::seconds(2)),
            Urgency::Normal => Some(Duration::seconds(10)),
            Urgency::Critical => None,
        }
    }
}

impl From<u8> for Urgency {
    fn from(value: u8) -> Self {
        match value {
            0 => Urgency::Low,
            2 => Urgency::Critical,
            _ => Urgency::Normal,
        }
    }
}

/// A notification received from an application
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    #[serde(flatten)]
    pub base: Base,
    pub id: u32,
    pub sender: String,
    pub body: String,
    pub urgency: Urgency,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
    /// When the notification stops being shown at all
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub expires: Option<DateTime<Utc>>,
    /// Set once the notification is closed but still retained
    pub deleted: bool,
    #[serde(skip)]
    commands: CommandBus,
}

impl Notification {
    /// Create a notification created now, with normal urgency and no
    /// expiry
    pub fn new(
        id: u32,
        sender: impl Into<String>,
        summary: impl Into<String>,
        body: impl Into<String>,
        commands: &CommandBus,
    ) -> Self {
        let sender = sender.into();
        Self {
            base: Base::new(summary, sender.clone(), "", Kind::Notification),
            id,
            sender,
            body: body.into(),
            urgency: Urgency::Normal,
            created: Utc::now(),
            expires: None,
            deleted: false,
            commands: commands.clone(),
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.base.icon = icon.into();
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// Expire `timeout` after creation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.expires = Some(self.created + timeout);
        self
    }

    /// Add the protocol's actions as (id, label) pairs, in order
    pub fn with_actions<I, S, T>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        for (id, label) in actions {
            self.base.add_action(id.as_ref(), label.as_ref(), "");
        }
        self
    }

    /// Copy of this notification marked as deleted
    pub fn mark_deleted(&self) -> Self {
        let mut deleted = self.clone();
        deleted.deleted = true;
        deleted
    }

    /// Whether the hard expiry has passed at `now`
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| now > expires)
    }

    /// Whether the urgency-based display window has passed at `now`
    pub fn soft_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.urgency
            .soft_expiry()
            .is_some_and(|window| self.created + window < now)
    }

    fn has_default_action(&self) -> bool {
        self.base.action(DEFAULT_ACTION).is_some()
    }

    /// Search visibility at `now`
    pub fn omit_at(&self, now: DateTime<Utc>) -> bool {
        self.deleted
            || self.expired_at(now)
            || (!self.has_default_action() && self.soft_expired_at(now))
    }
}

impl Entity for Notification {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn omit_from_search(&self) -> bool {
        self.omit_at(Utc::now())
    }

    fn as_postable(&self) -> Option<&dyn Postable> {
        Some(self)
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }
}

impl Postable for Notification {
    /// Invoke an action; the empty id picks the first listed action
    fn post(&self, action: &str) -> Result<(), RegistryError> {
        let action = self.base.resolve_action(action);
        if action.is_empty() {
            return Err(RegistryError::UnknownAction {
                path: self.base.meta.path.clone(),
                action: String::new(),
            });
        }
        command::post_listed(&self.commands, &self.base, action)
    }
}

impl Deletable for Notification {
    fn delete(&self) -> Result<(), RegistryError> {
        command::delete(&self.commands, &self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Command, Verb};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn notification(commands: &CommandBus) -> Notification {
        let mut n = Notification::new(7, "mail", "New mail", "From: bob", commands)
            .with_created(at(0));
        n.base.meta.path = "/notification/7".to_string();
        n
    }

    #[test]
    fn test_soft_expiry_by_urgency() {
        let commands = CommandBus::new();

        let normal = notification(&commands);
        assert!(!normal.omit_at(at(10)));
        assert!(normal.omit_at(at(11)));

        let low = notification(&commands).with_urgency(Urgency::Low);
        assert!(!low.omit_at(at(1)));
        assert!(low.omit_at(at(3)));

        let critical = notification(&commands).with_urgency(Urgency::Critical);
        assert!(!critical.omit_at(at(3600)));
    }

    #[test]
    fn test_default_action_keeps_visible() {
        let commands = CommandBus::new();
        let n = notification(&commands).with_actions([("default", "Open"), ("archive", "Archive")]);
        assert!(!n.omit_at(at(60)));
    }

    #[test]
    fn test_hard_expiry_and_deleted() {
        let commands = CommandBus::new();
        let n = notification(&commands)
            .with_actions([("default", "Open")])
            .with_timeout(Duration::seconds(30));

        assert!(!n.omit_at(at(30)));
        assert!(n.omit_at(at(31)));
        assert!(n.mark_deleted().omit_at(at(0)));
    }

    #[test]
    fn test_post_resolves_first_action() {
        let commands = CommandBus::new();
        let mut sub = commands.subscribe();
        let n = notification(&commands).with_actions([("reply", "Reply"), ("default", "Open")]);

        n.post("").unwrap();
        assert_eq!(sub.try_next(), Some(Command::post("/notification/7", "reply")));

        n.post("default").unwrap();
        assert_eq!(sub.try_next(), Some(Command::post("/notification/7", "default")));

        assert!(n.post("nope").is_err());
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn test_post_without_actions() {
        let commands = CommandBus::new();
        let n = notification(&commands);
        assert!(matches!(
            n.post(""),
            Err(RegistryError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_delete_dismisses() {
        let commands = CommandBus::new();
        let mut sub = commands.subscribe();

        notification(&commands).delete().unwrap();
        let cmd = sub.try_next().unwrap();
        assert_eq!(cmd.verb, Verb::Delete);
        assert_eq!(cmd.path, "/notification/7");
    }

    #[test]
    fn test_serialize() {
        let commands = CommandBus::new();
        let n = notification(&commands).with_urgency(Urgency::Low);
        let json = serde_json::to_value(&n).unwrap();

        assert_eq!(json["title"], "New mail");
        assert_eq!(json["urgency"], "low");
        assert_eq!(json["created"], 1_700_000_000_000i64);
        assert!(json["expires"].is_null());
        assert!(json.get("commands").is_none());
    }
}
