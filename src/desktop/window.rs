//! Toplevel windows reported by the compositor

use serde::Serialize;

use crate::entity::command;
use crate::entity::{Base, CommandBus, Deletable, Entity, Kind, Postable};
use crate::registry::RegistryError;

/// Title prefix of the launcher's own window, which never shows up in search
pub const LAUNCHER_TITLE_PREFIX: &str = "Deskhub";

/// Window state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowState {
    pub maximized: bool,
    pub minimized: bool,
    pub activated: bool,
    pub fullscreen: bool,
}

/// A toplevel window
#[derive(Debug, Clone, Serialize)]
pub struct Window {
    #[serde(flatten)]
    pub base: Base,
    #[serde(skip)]
    pub id: u64,
    pub app_id: String,
    pub state: WindowState,
    /// Whether `app_id` is on the configured ignore list
    #[serde(skip)]
    pub ignored: bool,
    #[serde(skip)]
    commands: CommandBus,
}

impl Window {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        icon: impl Into<String>,
        app_id: impl Into<String>,
        state: WindowState,
        commands: &CommandBus,
    ) -> Self {
        let app_id = app_id.into();
        let base = Base::new(title, format!("{} window", app_id), icon, Kind::Window)
            .with_action("", "Focus", "");

        Self {
            base,
            id,
            app_id,
            state,
            ignored: false,
            commands: commands.clone(),
        }
    }

    pub fn with_ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }
}

impl Entity for Window {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn omit_from_search(&self) -> bool {
        self.ignored || self.base.title.starts_with(LAUNCHER_TITLE_PREFIX)
    }

    fn as_postable(&self) -> Option<&dyn Postable> {
        Some(self)
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }
}

impl Postable for Window {
    /// Focus the window
    fn post(&self, action: &str) -> Result<(), RegistryError> {
        command::post_default(&self.commands, &self.base, action)
    }
}

impl Deletable for Window {
    /// Close the window
    fn delete(&self) -> Result<(), RegistryError> {
        command::delete(&self.commands, &self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Command;

    fn window(title: &str, commands: &CommandBus) -> Window {
        Window::new(3, title, "foot", "foot", WindowState::default(), commands)
    }

    #[test]
    fn test_subtitle_and_focus_action() {
        let w = window("~/src", &CommandBus::new());
        assert_eq!(w.base.subtitle, "foot window");
        assert!(w.base.action("").is_some());
    }

    #[test]
    fn test_omit_from_search() {
        let commands = CommandBus::new();
        assert!(!window("~/src", &commands).omit_from_search());
        assert!(window("Deskhub launcher", &commands).omit_from_search());
        assert!(window("~/src", &commands).with_ignored(true).omit_from_search());
    }

    #[test]
    fn test_post_focuses() {
        let commands = CommandBus::new();
        let mut sub = commands.subscribe();
        let mut w = window("~/src", &commands);
        w.base.meta.path = "/window/3".to_string();

        w.post("").unwrap();
        assert_eq!(sub.try_next(), Some(Command::post("/window/3", "")));
        assert!(w.post("maximize").is_err());
    }

    #[test]
    fn test_serialize_state() {
        let w = Window::new(
            9,
            "Docs",
            "",
            "firefox",
            WindowState {
                activated: true,
                ..WindowState::default()
            },
            &CommandBus::new(),
        );
        let json = serde_json::to_value(&w).unwrap();

        assert_eq!(json["app_id"], "firefox");
        assert_eq!(json["state"]["activated"], true);
        assert!(json.get("id").is_none());
        assert!(json.get("ignored").is_none());
    }
}
