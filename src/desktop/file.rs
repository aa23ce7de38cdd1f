//! Files in watched directories

use serde::Serialize;

use crate::entity::command;
use crate::entity::{Base, CommandBus, Entity, Kind, Postable};
use crate::registry::RegistryError;

/// A file, keyed by its absolute path without the leading slash
#[derive(Debug, Clone, Serialize)]
pub struct File {
    #[serde(flatten)]
    pub base: Base,
    pub name: String,
    pub os_path: String,
    pub mimetype: String,
    #[serde(skip)]
    commands: CommandBus,
}

impl File {
    pub fn new(os_path: impl Into<String>, mimetype: impl Into<String>, commands: &CommandBus) -> Self {
        let os_path = os_path.into();
        let mimetype = mimetype.into();
        let name = os_path
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or("/")
            .to_string();
        let icon = mimetype.replace('/', "-");

        Self {
            base: Base::new(name.clone(), os_path.clone(), icon, Kind::File).with_action("", "Open", ""),
            name,
            os_path,
            mimetype,
            commands: commands.clone(),
        }
    }

    /// Offer an application that can open this file; the action id is the
    /// application's desktop id
    pub fn with_handler(mut self, desktop_id: &str, name: &str, icon: &str) -> Self {
        self.base.add_action(desktop_id, name, icon);
        self
    }
}

impl Entity for File {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn as_postable(&self) -> Option<&dyn Postable> {
        Some(self)
    }
}

impl Postable for File {
    /// Open with the default application, or the handler named by `action`
    fn post(&self, action: &str) -> Result<(), RegistryError> {
        command::post_listed(&self.commands, &self.base, action)
    }
}
