//! Fan-in of several buses into one
//!
//! One relay task per source bus repeatedly waits for the next event and
//! republishes it on the shared output bus. Each source's own order is
//! preserved; there is no global order across sources.

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::chain::EventBus;
use super::event::Event;

/// Merges the events of several buses into one output bus
pub struct Aggregator<T = Event> {
    output: EventBus<T>,
    relays: Mutex<Vec<JoinHandle<()>>>,
}

impl<T: Clone + Send + Sync + 'static> Aggregator<T> {
    /// Create an aggregator with no sources
    pub fn new() -> Self {
        Self {
            output: EventBus::new(),
            relays: Mutex::new(Vec::new()),
        }
    }

    /// The combined bus
    pub fn output(&self) -> &EventBus<T> {
        &self.output
    }

    /// Start relaying `source` into the output bus
    ///
    /// The subscription is taken before this returns, so every event
    /// published on `source` afterwards is forwarded. Must be called from
    /// within a tokio runtime.
    pub fn follow(&self, label: &str, source: &EventBus<T>) {
        let mut subscription = source.subscribe();
        let output = self.output.clone();
        let label = label.to_string();

        let handle = tokio::spawn(async move {
            tracing::debug!(source = %label, "Relay started");
            loop {
                let value = subscription.next().await;
                output.publish(value);
            }
        });

        self.relays.lock().push(handle);
    }

    /// Number of relay tasks started
    pub fn relay_count(&self) -> usize {
        self.relays.lock().len()
    }

    /// Stop every relay
    pub fn shutdown(&self) {
        let relays: Vec<_> = self.relays.lock().drain(..).collect();
        let count = relays.len();
        for relay in relays {
            relay.abort();
        }
        if count > 0 {
            tracing::debug!(relays = count, "Aggregator stopped");
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Aggregator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Aggregator<T> {
    fn drop(&mut self) {
        for relay in self.relays.get_mut().drain(..) {
            relay.abort();
        }
    }
}
