//! Common display and addressing record
//!
//! `Base` is the part of an entity that the search engine, the completion
//! endpoint and the HTTP layer understand without knowing the concrete kind.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use super::kind::Kind;

/// An invokable action attached to an entity
///
/// The empty id denotes the default action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Action {
    /// Action id, passed back as `?action=<id>`
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon name or URL (may be empty)
    pub icon: String,
}

impl Action {
    /// Create a new action
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
        }
    }

    /// Whether this is the default action
    pub fn is_default(&self) -> bool {
        self.id.is_empty()
    }

    /// Link target for this action on the resource at `path`
    pub fn href(&self, path: &str) -> String {
        if self.id.is_empty() {
            path.to_string()
        } else {
            format!("{}?action={}", path, self.id)
        }
    }
}

/// Relation of a link to the resource it is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relation {
    /// The resource itself
    #[serde(rename = "self")]
    Resource,
    /// An action that can be posted
    #[serde(rename = "action")]
    Action,
}

/// A serialized link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    pub relation: Relation,
}

/// Addressing and behaviour metadata
///
/// `path` is owned by the registry: it is overwritten with
/// `basepath + key` whenever the entity is stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Meta {
    pub path: String,
    pub actions: Vec<Action>,
    pub keywords: Vec<String>,
}

/// Common entity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub kind: Kind,
    pub meta: Meta,
}

impl Base {
    /// Create a base record with no path, actions or keywords
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        icon: impl Into<String>,
        kind: Kind,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon: icon.into(),
            kind,
            meta: Meta::default(),
        }
    }

    /// Add search keywords
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Add an action
    pub fn with_action(mut self, id: &str, name: &str, icon: &str) -> Self {
        self.add_action(id, name, icon);
        self
    }

    /// Append an action to the action list
    pub fn add_action(&mut self, id: &str, name: &str, icon: &str) {
        self.meta.actions.push(Action::new(id, name, icon));
    }

    /// The registry-assigned path
    pub fn path(&self) -> &str {
        &self.meta.path
    }

    /// Look up an action by id
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.meta.actions.iter().find(|a| a.id == id)
    }

    /// Resolve the empty action id to the first listed action
    ///
    /// Used by kinds whose "default" is whatever they list first.
    pub fn resolve_action<'a>(&'a self, id: &'a str) -> &'a str {
        if id.is_empty() {
            self.meta.actions.first().map(|a| a.id.as_str()).unwrap_or(id)
        } else {
            id
        }
    }

    /// Links derived from the path and actions
    ///
    /// The resource itself first, then one link per action.
    pub fn links(&self) -> Vec<Link> {
        let path = self.meta.path.as_str();
        let mut links = Vec::with_capacity(1 + self.meta.actions.len());

        links.push(Link {
            href: path.to_string(),
            title: self.title.clone(),
            icon: self.icon.clone(),
            relation: Relation::Resource,
        });

        for action in &self.meta.actions {
            links.push(Link {
                href: action.href(path),
                title: action.name.clone(),
                icon: action.icon.clone(),
                relation: Relation::Action,
            });
        }

        links
    }
}

impl Serialize for Base {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Base", 7)?;
        state.serialize_field("title", &self.title)?;
        if self.subtitle.is_empty() {
            state.skip_field("subtitle")?;
        } else {
            state.serialize_field("subtitle", &self.subtitle)?;
        }
        state.serialize_field("icon", &self.icon)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("path", &self.meta.path)?;
        state.serialize_field("keywords", &self.meta.keywords)?;
        state.serialize_field("links", &self.links())?;
        state.end()
    }
}
