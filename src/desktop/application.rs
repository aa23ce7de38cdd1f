//! Installed applications

use serde::Serialize;

use crate::entity::command;
use crate::entity::{Base, CommandBus, Entity, Kind, Postable};
use crate::registry::RegistryError;

/// A launchable application, keyed by its desktop file id
#[derive(Debug, Clone, Serialize)]
pub struct Application {
    #[serde(flatten)]
    pub base: Base,
    pub desktop_id: String,
    pub exec: String,
    /// Hidden from menus and search
    pub no_display: bool,
    #[serde(skip)]
    commands: CommandBus,
}

impl Application {
    pub fn new(
        desktop_id: impl Into<String>,
        name: impl Into<String>,
        comment: impl Into<String>,
        icon: impl Into<String>,
        exec: impl Into<String>,
        commands: &CommandBus,
    ) -> Self {
        let base = Base::new(name, comment, icon, Kind::Application).with_action("", "Launch", "");

        Self {
            base,
            desktop_id: desktop_id.into(),
            exec: exec.into(),
            no_display: false,
            commands: commands.clone(),
        }
    }

    pub fn with_no_display(mut self, no_display: bool) -> Self {
        self.no_display = no_display;
        self
    }

    /// Add a desktop action such as "new-window"
    pub fn with_desktop_action(mut self, id: &str, name: &str, icon: &str) -> Self {
        self.base.add_action(id, name, icon);
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base = self.base.with_keywords(keywords);
        self
    }
}

impl Entity for Application {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn omit_from_search(&self) -> bool {
        self.no_display
    }

    fn as_postable(&self) -> Option<&dyn Postable> {
        Some(self)
    }
}

impl Postable for Application {
    /// Launch the application or one of its desktop actions
    fn post(&self, action: &str) -> Result<(), RegistryError> {
        command::post_listed(&self.commands, &self.base, action)
    }
}
