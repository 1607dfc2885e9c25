//! Event dispatcher.
//!
//! Maps an event kind to an ordered list of named listeners. The listener
//! set is rebuilt on every bootstrap cycle: the preparer clears it before
//! registering the current cycle's listeners, so handlers from a previous
//! cycle can never fire again.

use std::collections::HashMap;

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::warn;

use lumihub_core::{EventKind, GatewayEvent, Result};

/// Future returned by a listener invocation.
pub type ListenerFuture = BoxFuture<'static, Result<()>>;

type ListenerFn = Box<dyn Fn(GatewayEvent) -> ListenerFuture + Send + Sync>;

struct Listener {
    name: String,
    callback: ListenerFn,
}

/// Kind → ordered listeners registry.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<HashMap<EventKind, Vec<Listener>>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for the given kind.
    pub async fn add_listener<F>(&self, kind: EventKind, name: impl Into<String>, callback: F)
    where
        F: Fn(GatewayEvent) -> ListenerFuture + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write().await;
        listeners.entry(kind).or_default().push(Listener {
            name: name.into(),
            callback: Box::new(callback),
        });
    }

    /// Dispatch one event to every listener of its kind, in registration
    /// order.
    ///
    /// Listener errors are logged and swallowed so later listeners in the
    /// same dispatch still run.
    pub async fn dispatch(&self, event: GatewayEvent) {
        let listeners = self.listeners.read().await;
        let Some(registered) = listeners.get(&event.kind()) else {
            return;
        };
        for listener in registered {
            if let Err(error) = (listener.callback)(event.clone()).await {
                warn!(listener = %listener.name, %error, "event listener failed");
            }
        }
    }

    /// Remove every listener of every kind.
    pub async fn clear(&self) {
        self.listeners.write().await.clear();
    }

    /// Number of listeners registered for the given kind.
    pub async fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .await
            .get(&kind)
            .map_or(0, Vec::len)
    }
}
