//! deskhub daemon
//!
//! Run with: deskhub [--config deskhub.toml] [--bind 127.0.0.1:7938]
//!
//! Serves the desktop session's registries over HTTP. Producers attach to
//! the hub in-process; until they do, the registries hold only the seeded
//! power actions. Commands posted by clients are logged.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use deskhub::entity::Verb;
use deskhub::logging::init_logging;
use deskhub::{HttpServer, Hub, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "deskhub")]
#[command(about = "Desktop session resource hub", long_about = None)]
struct Args {
    /// Configuration file (toml, yaml or json)
    #[arg(long, short, env = "DESKHUB_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen address
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Do not serve notifications
    #[arg(long)]
    no_notifications: bool,

    /// Keep windows of this app id out of search (repeatable)
    #[arg(long = "ignore-window", value_name = "APP_ID")]
    ignore_window: Vec<String>,

    /// Maximum concurrent watch streams (0 = unlimited)
    #[arg(long)]
    max_watchers: Option<usize>,

    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(addr) = self.bind {
            config = config.bind(addr);
        }
        if self.no_notifications {
            config = config.disable_notifications();
        }
        for app_id in self.ignore_window {
            config = config.ignore_window(app_id);
        }
        if let Some(max) = self.max_watchers {
            config = config.max_connections(max);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        config
    }
}

/// Log every command until the hub goes away
///
/// Bridges to the compositor, notification daemon and browsers subscribe
/// to the same bus and act on the commands addressed to them.
fn spawn_command_log(hub: &Hub) {
    let mut commands = hub.commands().subscribe();
    tokio::spawn(async move {
        loop {
            let command = commands.next().await;
            match command.verb {
                Verb::Post => info!(path = %command.path, action = %command.action, "Post command"),
                Verb::Delete => info!(path = %command.path, "Delete command"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(args.config.as_deref())?;
    let config = args.apply(config);

    init_logging(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "deskhub starting");

    let hub = Arc::new(Hub::new(&config));
    spawn_command_log(&hub);

    let server = HttpServer::new(config, Arc::clone(&hub));
    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("deskhub stopped");
    Ok(())
}
