//! Append-only broadcast chain
//!
//! The bus points at the newest node of a singly linked chain. Publishing
//! links a new node after the tail and moves the tail forward; each
//! [`Subscription`] is a cursor that walks the chain at its own pace.
//!
//! ```text
//!   sub A        sub B            tail
//!     │            │               │
//!     ▼            ▼               ▼
//!   [n3] ─e4─► [n4] ─e5─► [n5] ─e6─► [n6] ─► (unset)
//! ```
//!
//! An event is stored on the link leading out of a node, so a cursor at
//! node `n` has consumed everything up to `n` and its next event is the one
//! on `n`'s outgoing link. Nodes are reference counted: once no cursor sits
//! at or behind a node it is freed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Notify;

/// One position in the chain
struct Node<T> {
    /// Number of events published before this node became the tail
    seq: u64,
    /// Event leading to the following node; set exactly once
    next: OnceLock<(T, Arc<Node<T>>)>,
    /// Live node counter shared with the owning bus
    live: Arc<AtomicUsize>,
}

impl<T> Node<T> {
    fn new(seq: u64, live: &Arc<AtomicUsize>) -> Arc<Self> {
        live.fetch_add(1, Ordering::Relaxed);
        Arc::new(Self {
            seq,
            next: OnceLock::new(),
            live: Arc::clone(live),
        })
    }
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::Relaxed);

        // Unlink iteratively so freeing a long backlog does not recurse once
        // per node.
        let mut next = self.next.take();
        while let Some((_, node)) = next {
            next = match Arc::try_unwrap(node) {
                Ok(mut node) => node.next.take(),
                Err(_) => None,
            };
        }
    }
}

struct Shared<T> {
    tail: Mutex<Arc<Node<T>>>,
    notify: Notify,
    live: Arc<AtomicUsize>,
    subscribers: AtomicUsize,
}

/// Snapshot of a bus's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Total events published
    pub published: u64,
    /// Live subscriptions
    pub subscribers: usize,
    /// Chain nodes currently allocated, including the tail
    pub retained_nodes: usize,
}

/// Multi-subscriber broadcast log
///
/// Cheap to clone; clones share the same chain.
pub struct EventBus<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("published", &self.shared.tail.lock().seq)
            .field("subscribers", &self.shared.subscribers.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Create an empty bus
    pub fn new() -> Self {
        let live = Arc::new(AtomicUsize::new(0));
        let tail = Node::new(0, &live);

        Self {
            shared: Arc::new(Shared {
                tail: Mutex::new(tail),
                notify: Notify::new(),
                live,
                subscribers: AtomicUsize::new(0),
            }),
        }
    }

    /// Append an event and wake every waiting subscriber
    ///
    /// O(1); never waits for subscribers.
    pub fn publish(&self, value: T) {
        {
            let mut tail = self.shared.tail.lock();
            let node = Node::new(tail.seq + 1, &self.shared.live);
            // Only the tail is ever linked, and only under this lock.
            if tail.next.set((value, Arc::clone(&node))).is_err() {
                unreachable!("bus tail linked twice");
            }
            *tail = node;
        }
        self.shared.notify.notify_waiters();
    }

    /// Subscribe from the current tail
    ///
    /// Nothing published before this call is replayed.
    pub fn subscribe(&self) -> Subscription<T> {
        let at = Arc::clone(&self.shared.tail.lock());
        self.shared.subscribers.fetch_add(1, Ordering::Relaxed);

        Subscription {
            shared: Arc::clone(&self.shared),
            at,
        }
    }

    /// Total number of events published
    pub fn published(&self) -> u64 {
        self.shared.tail.lock().seq
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.load(Ordering::Relaxed)
    }

    /// Number of chain nodes currently allocated
    pub fn retained_nodes(&self) -> usize {
        self.shared.live.load(Ordering::Relaxed)
    }

    /// Get bus statistics
    pub fn stats(&self) -> BusStats {
        BusStats {
            published: self.published(),
            subscribers: self.subscriber_count(),
            retained_nodes: self.retained_nodes(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A cursor into a bus's chain
///
/// Dropping the subscription releases every node only it was holding.
pub struct Subscription<T> {
    shared: Arc<Shared<T>>,
    at: Arc<Node<T>>,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    /// Wait for and return the next event
    ///
    /// Cancel safe: if the future is dropped before completing, no event is
    /// consumed.
    pub async fn next(&mut self) -> T {
        let shared = Arc::clone(&self.shared);
        loop {
            let notified = shared.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a publish in between is not missed.
            notified.as_mut().enable();

            if let Some(value) = self.try_next() {
                return value;
            }

            notified.await;
        }
    }

    /// Return the next event if one is already published
    pub fn try_next(&mut self) -> Option<T> {
        let (value, node) = self.at.next.get()?;
        let value = value.clone();
        let node = Arc::clone(node);
        self.at = node;
        Some(value)
    }

    /// Number of published events this subscription has not consumed yet
    pub fn lag(&self) -> u64 {
        let tail = self.shared.tail.lock().seq;
        tail.saturating_sub(self.at.seq)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.shared.subscribers.fetch_sub(1, Ordering::Relaxed);
    }
}
