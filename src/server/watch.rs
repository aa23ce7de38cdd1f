//! Live change stream (`GET /watch`)
//!
//! Each connection subscribes to the hub's aggregate bus and receives one
//! server-sent event per registry mutation:
//!
//! ```text
//! :keep-alive
//!
//! event:/window/
//! data:42
//!
//! event:/tab/
//! data:
//! ```
//!
//! `event` is the registry's basepath and `data` the changed key (empty for
//! bulk changes). Clients re-fetch whatever they display.

use std::convert::Infallible;
use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use tokio::sync::OwnedSemaphorePermit;

use super::error::{AppError, AppResult};
use super::routes::AppState;
use crate::bus::{Event, Subscription};

/// Comment frame sent before the first event
pub const KEEP_ALIVE: &[u8] = b":keep-alive\n\n";

/// Render one event as a server-sent event frame
pub fn frame(event: &Event) -> Bytes {
    Bytes::from(format!("event:{}\ndata:{}\n\n", event.topic, event.id))
}

/// Per-connection state, dropped when the client goes away or the server
/// shuts down
struct WatchSession {
    id: u64,
    subscription: Subscription<Event>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        tracing::debug!(
            watch_id = self.id,
            unread = self.subscription.lag(),
            "Watcher disconnected"
        );
    }
}

fn event_stream(session: WatchSession) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
    let keep_alive = stream::once(async { Ok(Bytes::from_static(KEEP_ALIVE)) });

    let events = stream::unfold(session, |mut session| async move {
        let event = session.subscription.next().await;
        Some((Ok(frame(&event)), session))
    });

    keep_alive.chain(events)
}

/// Stream registry changes to the client until it disconnects
pub async fn watch(State(state): State<AppState>) -> AppResult<Response> {
    let permit = match &state.watch_limit {
        Some(limit) => match limit.clone().try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(_) => {
                tracing::warn!("Watch rejected: limit reached");
                return Err(AppError::service_unavailable("Too many watchers"));
            }
        },
        None => None,
    };

    let id = state.next_watch_id.fetch_add(1, Ordering::Relaxed);
    let session = WatchSession {
        id,
        subscription: state.hub.events().subscribe(),
        _permit: permit,
    };

    tracing::debug!(watch_id = id, "Watcher connected");

    let stream = event_stream(session).take_until(state.shutdown.clone().cancelled_owned());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(stream))
        .map_err(|_| AppError::internal("Failed to build response"))
}
