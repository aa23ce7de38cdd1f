//! Registry error types
//!
//! Storage operations never fail; these errors come from action dispatch.

/// Error type for action dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No entity stored under the path
    NotFound(String),
    /// The entity has no capability for the request
    NotAllowed(String),
    /// The entity does not know the requested action id
    UnknownAction { path: String, action: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound(path) => write!(f, "Resource not found: {}", path),
            RegistryError::NotAllowed(path) => write!(f, "Operation not allowed on: {}", path),
            RegistryError::UnknownAction { path, action } => {
                write!(f, "Unknown action '{}' on: {}", action, path)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
