//! Browser tabs and bookmarks reported by browser extensions

use serde::Serialize;

use crate::entity::command;
use crate::entity::{Base, CommandBus, Deletable, Entity, Kind, Postable};
use crate::registry::RegistryError;

/// Longest tab title kept before shortening
const MAX_TITLE_CHARS: usize = 60;

fn shorten(title: &str) -> String {
    if title.chars().count() > MAX_TITLE_CHARS {
        let mut short: String = title.chars().take(MAX_TITLE_CHARS).collect();
        short.push_str("...");
        short
    } else {
        title.to_string()
    }
}

/// An open browser tab
///
/// Each browser owns the slice of the tab registry whose `browser_id` is
/// its own and refreshes it with `Registry::replace`.
#[derive(Debug, Clone, Serialize)]
pub struct Tab {
    #[serde(flatten)]
    pub base: Base,
    pub id: String,
    pub browser_id: String,
    pub url: String,
    #[serde(skip)]
    commands: CommandBus,
}

impl Tab {
    pub fn new(
        id: impl Into<String>,
        browser_id: impl Into<String>,
        browser_name: &str,
        title: &str,
        url: impl Into<String>,
        favicon: impl Into<String>,
        commands: &CommandBus,
    ) -> Self {
        let base = Base::new(shorten(title), format!("{} tab", browser_name), favicon, Kind::Tab)
            .with_action("", "Focus tab", "");

        Self {
            base,
            id: id.into(),
            browser_id: browser_id.into(),
            url: url.into(),
            commands: commands.clone(),
        }
    }
}

impl Entity for Tab {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }

    fn as_postable(&self) -> Option<&dyn Postable> {
        Some(self)
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }
}

impl Postable for Tab {
    fn post(&self, action: &str) -> Result<(), RegistryError> {
        command::post_default(&self.commands, &self.base, action)
    }
}

impl Deletable for Tab {
    fn delete(&self) -> Result<(), RegistryError> {
        command::delete(&self.commands, &self.base)
    }
}

/// A browser bookmark
#[derive(Debug, Clone, Serialize)]
pub struct Bookmark {
    #[serde(flatten)]
    pub base: Base,
    pub id: String,
    pub url: String,
    #[serde(skip)]
    commands: CommandBus,
}

impl Bookmark {
    pub fn new(
        id: impl Into<String>,
        title: &str,
        url: impl Into<String>,
        commands: &CommandBus,
    ) -> Self {
        let url = url.into();
        let base = Base::new(title, url.clone(), "bookmark", Kind::Bookmark)
            .with_action("", "Open", "");

        Self {
            base,
            id: id.into(),
            url,
            commands: commands.clone(),
        }
    }
}

impl Entity for Bookmark {
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

impl Postable for Bookmark {
    /// Open the bookmark
    fn post(&self, action: &str) -> Result<(), RegistryError> {
        command::post_default(&self.commands, &self.base, action)
    }
}
