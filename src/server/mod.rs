//! HTTP server
//!
//! Typed axum handlers over the hub: per-registry resource routes, search,
//! completion, details, stats and the `/watch` event stream.

pub mod config;
pub mod error;
pub mod listener;
pub mod routes;
pub mod watch;

pub use config::{LoggingConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use listener::HttpServer;
pub use routes::{router, AppState};
