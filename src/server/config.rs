//! Server configuration

use std::net::SocketAddr;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 7938;

/// Environment variable prefix (`DESKHUB_BIND_ADDR`, `DESKHUB_LOGGING__LEVEL`)
pub const ENV_PREFIX: &str = "DESKHUB";

/// Logging options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    /// Append log output to this file instead of stdout
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Server configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Serve the notification registry
    pub notifications: bool,

    /// App ids whose windows never show up in search
    pub ignored_window_app_ids: Vec<String>,

    /// Maximum concurrent watch streams (0 = unlimited)
    pub max_connections: usize,

    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            notifications: true,
            ignored_window_app_ids: Vec::new(),
            max_connections: 0, // Unlimited
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration, in increasing priority: defaults, the config
    /// file (if given and present), `DESKHUB_*` environment variables
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            } else {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("ignored_window_app_ids")
                .try_parsing(true),
        );

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum concurrent watch streams
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Do not serve notifications
    pub fn disable_notifications(mut self) -> Self {
        self.notifications = false;
        self
    }

    /// Leave windows of `app_id` out of search
    pub fn ignore_window(mut self, app_id: impl Into<String>) -> Self {
        self.ignored_window_app_ids.push(app_id.into());
        self
    }

    /// Set logging options
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert!(config.bind_addr.ip().is_loopback());
        assert_eq!(config.max_connections, 0);
        assert!(config.notifications);
        assert!(config.ignored_window_app_ids.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .max_connections(50)
            .disable_notifications()
            .ignore_window("org.deskhub.launcher")
            .ignore_window("panel");

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_connections, 50);
        assert!(!config.notifications);
        assert_eq!(config.ignored_window_app_ids, vec!["org.deskhub.launcher", "panel"]);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        assert_eq!(ServerConfig::with_addr(addr).bind_addr.port(), 9000);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("deskhub-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "bind_addr = \"127.0.0.1:7000\"\nnotifications = false\nignored_window_app_ids = [\"panel\"]\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.bind_addr.port(), 7000);
        assert!(!config.notifications);
        assert_eq!(config.ignored_window_app_ids, vec!["panel"]);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.max_connections, 0);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = ServerConfig::load(Some(Path::new("/nonexistent/deskhub.toml"))).unwrap();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
    }
}
