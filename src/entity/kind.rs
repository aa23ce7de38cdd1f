//! Entity kind tags

use serde::{Serialize, Serializer};

/// Kind of an entity
///
/// Serializes as a vendor media type so clients can pick a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Application,
    Window,
    Tab,
    File,
    Device,
    Notification,
    Start,
    Bookmark,
}

impl Kind {
    /// Vendor media type
    pub fn media_type(&self) -> &'static str {
        match self {
            Kind::Application => "application/vnd.deskhub.application+json",
            Kind::Window => "application/vnd.deskhub.window+json",
            Kind::Tab => "application/vnd.deskhub.tab+json",
            Kind::File => "application/vnd.deskhub.file+json",
            Kind::Device => "application/vnd.deskhub.device+json",
            Kind::Notification => "application/vnd.deskhub.notification+json",
            Kind::Start => "application/vnd.deskhub.start+json",
            Kind::Bookmark => "application/vnd.deskhub.bookmark+json",
        }
    }

    /// Short human readable name
    pub fn short(&self) -> &'static str {
        match self {
            Kind::Application => "Application",
            Kind::Window => "Window",
            Kind::Tab => "Tab",
            Kind::File => "File",
            Kind::Device => "Device",
            Kind::Notification => "Notification",
            Kind::Start => "Start",
            Kind::Bookmark => "Bookmark",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short())
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.media_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type() {
        assert_eq!(
            Kind::Window.media_type(),
            "application/vnd.deskhub.window+json"
        );
        assert_eq!(serde_json::to_string(&Kind::Tab).unwrap(), "\"application/vnd.deskhub.tab+json\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(Kind::Bookmark.to_string(), "Bookmark");
    }
}
