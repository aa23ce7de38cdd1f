//! Registry change events

use serde::Serialize;

/// A change notification
///
/// Carries no payload: consumers re-fetch the resource. `topic` is the
/// registry's basepath and `id` the mutated key, or empty for bulk changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Event {
    pub topic: String,
    pub id: String,
}

impl Event {
    /// Event for a single key
    pub fn new(topic: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            id: id.into(),
        }
    }

    /// Event for a bulk operation
    pub fn bulk(topic: impl Into<String>) -> Self {
        Self::new(topic, "")
    }

    /// Whether this event signals a bulk change
    pub fn is_bulk(&self) -> bool {
        self.id.is_empty()
    }

    /// Path of the changed resource, if a single one changed
    pub fn path(&self) -> Option<String> {
        if self.is_bulk() {
            None
        } else {
            Some(format!("{}{}", self.topic, self.id))
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_bulk() {
            write!(f, "{}*", self.topic)
        } else {
            write!(f, "{}{}", self.topic, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        let event = Event::new("/window/", "42");
        assert!(!event.is_bulk());
        assert_eq!(event.path().as_deref(), Some("/window/42"));
        assert_eq!(event.to_string(), "/window/42");
    }

    #[test]
    fn test_bulk() {
        let event = Event::bulk("/tab/");
        assert!(event.is_bulk());
        assert_eq!(event.path(), None);
        assert_eq!(event.to_string(), "/tab/*");
    }
}
