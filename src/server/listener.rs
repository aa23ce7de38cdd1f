//! HTTP server listener
//!
//! Binds the configured address and serves the router until shut down.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::desktop::Hub;
use crate::error::Result;
use crate::server::config::ServerConfig;
use crate::server::routes::{router, AppState};

/// HTTP front end of a [`Hub`]
pub struct HttpServer {
    config: ServerConfig,
    hub: Arc<Hub>,
    shutdown: CancellationToken,
}

impl HttpServer {
    /// Create a new server for `hub`
    pub fn new(config: ServerConfig, hub: Arc<Hub>) -> Self {
        Self {
            config,
            hub,
            shutdown: CancellationToken::new(),
        }
    }

    /// Get a reference to the hub
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Build the router served by this server
    pub fn router(&self) -> Router {
        let state = AppState::new(
            Arc::clone(&self.hub),
            self.config.max_connections,
            self.shutdown.clone(),
        );
        router(state)
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener
    ///
    /// When `shutdown` completes, open watch streams are ended, in-flight
    /// requests are drained and the hub's relays are stopped.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(addr = %addr, "HTTP server listening");

        let token = self.shutdown.clone();
        let signal = async move {
            shutdown.await;
            tracing::info!("Shutdown signal received");
            token.cancel();
        };

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await?;

        self.hub.shutdown();
        Ok(())
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
