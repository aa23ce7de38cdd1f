//! HTTP routes
//!
//! Every registry is mounted under its prefix:
//!
//! ```text
//! GET    /window/               all windows
//! GET    /window/{key}          one window
//! POST   /window/{key}?action=  invoke an action (202)
//! DELETE /window/{key}          close or dismiss (202)
//! ```
//!
//! plus the hub-wide endpoints `/health`, `/search`, `/complete`,
//! `/details`, `/stats` and `/watch`.

use std::str::FromStr;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use super::error::{AppError, AppResult};
use super::watch::watch;
use crate::desktop::Hub;
use crate::entity::{Base, Entity};
use crate::registry::{Registry, RegistryError, RegistryKey};
use crate::search::Ranked;
use crate::stats::HubStats;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
    /// Bounds concurrent watch streams; `None` means unlimited
    pub watch_limit: Option<Arc<Semaphore>>,
    /// Cancelled when the server shuts down, ending every watch stream
    pub shutdown: CancellationToken,
    pub next_watch_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(hub: Arc<Hub>, max_watchers: usize, shutdown: CancellationToken) -> Self {
        let watch_limit = if max_watchers > 0 {
            Some(Arc::new(Semaphore::new(max_watchers)))
        } else {
            None
        };

        Self {
            hub,
            watch_limit,
            shutdown,
            next_watch_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Build the full router
pub fn router(state: AppState) -> Router {
    let hub = Arc::clone(&state.hub);

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/complete", get(complete))
        .route("/details", get(details))
        .route("/stats", get(stats))
        .route("/watch", get(watch))
        .merge(registry_routes(Arc::clone(&hub.windows)))
        .merge(registry_routes(Arc::clone(&hub.tabs)))
        .merge(registry_routes(Arc::clone(&hub.applications)))
        .merge(registry_routes(Arc::clone(&hub.devices)))
        .merge(registry_routes(Arc::clone(&hub.files)))
        .merge(registry_routes(Arc::clone(&hub.bookmarks)))
        .merge(registry_routes(Arc::clone(&hub.power_actions)));

    if hub.notifications_enabled() {
        router = router.merge(registry_routes(Arc::clone(&hub.notifications)));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Routes for one registry, mounted at its prefix
pub fn registry_routes<K, V, S>(registry: Arc<Registry<K, V>>) -> Router<S>
where
    K: RegistryKey + FromStr,
    V: Entity,
    S: Clone + Send + Sync + 'static,
{
    let prefix = registry.prefix();

    Router::new()
        .route(&prefix, get(list::<K, V>))
        .route(
            &format!("{}{{*key}}", prefix),
            get(get_one::<K, V>)
                .post(post_one::<K, V>)
                .delete(delete_one::<K, V>),
        )
        .with_state(registry)
}

fn parse_key<K, V>(registry: &Registry<K, V>, raw: &str) -> Result<K, AppError>
where
    K: RegistryKey + FromStr,
    V: Entity,
{
    raw.parse::<K>().map_err(|_| {
        AppError::from(RegistryError::NotFound(format!("{}{}", registry.prefix(), raw)))
    })
}

async fn list<K, V>(State(registry): State<Arc<Registry<K, V>>>) -> Json<Vec<V>>
where
    K: RegistryKey + FromStr,
    V: Entity,
{
    Json(registry.get_all())
}

async fn get_one<K, V>(
    State(registry): State<Arc<Registry<K, V>>>,
    Path(raw): Path<String>,
) -> AppResult<Json<V>>
where
    K: RegistryKey + FromStr,
    V: Entity,
{
    let key = parse_key(&registry, &raw)?;
    registry
        .get(&key)
        .map(Json)
        .ok_or_else(|| RegistryError::NotFound(format!("{}{}", registry.prefix(), raw)).into())
}

#[derive(Debug, Default, Deserialize)]
struct ActionQuery {
    #[serde(default)]
    action: String,
}

async fn post_one<K, V>(
    State(registry): State<Arc<Registry<K, V>>>,
    Path(raw): Path<String>,
    Query(query): Query<ActionQuery>,
) -> AppResult<StatusCode>
where
    K: RegistryKey + FromStr,
    V: Entity,
{
    let key = parse_key(&registry, &raw)?;
    registry.post(&key, &query.action).map_err(|e| {
        tracing::warn!(error = %e, "Post rejected");
        AppError::from(e)
    })?;
    Ok(StatusCode::ACCEPTED)
}

async fn delete_one<K, V>(
    State(registry): State<Arc<Registry<K, V>>>,
    Path(raw): Path<String>,
) -> AppResult<StatusCode>
where
    K: RegistryKey + FromStr,
    V: Entity,
{
    let key = parse_key(&registry, &raw)?;
    registry.delete(&key).map_err(|e| {
        tracing::warn!(error = %e, "Delete rejected");
        AppError::from(e)
    })?;
    Ok(StatusCode::ACCEPTED)
}

async fn health() -> impl IntoResponse {
    "OK"
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    term: String,
}

async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Json<Vec<Ranked>> {
    Json(state.hub.search(&query.term))
}

#[derive(Debug, Default, Deserialize)]
struct CompleteQuery {
    #[serde(default)]
    prefix: String,
}

async fn complete(State(state): State<AppState>, Query(query): Query<CompleteQuery>) -> Json<Vec<String>> {
    Json(state.hub.complete(&query.prefix))
}

#[derive(Debug, Deserialize)]
struct DetailsQuery {
    path: String,
}

async fn details(State(state): State<AppState>, Query(query): Query<DetailsQuery>) -> AppResult<Json<Base>> {
    state
        .hub
        .details(&query.path)
        .map(Json)
        .ok_or_else(|| RegistryError::NotFound(query.path).into())
}

async fn stats(State(state): State<AppState>) -> Json<HubStats> {
    Json(state.hub.stats())
}
