//! Typed observer registry plus broadcast stream.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::types::SubscriptionId;

use super::events::{EventKind, LogEvent};

/// Callback invoked synchronously on the emitting thread.
pub type EventHandler = Arc<dyn Fn(&LogEvent) + Send + Sync>;

struct Registration {
    id: SubscriptionId,
    kind: EventKind,
    handler: EventHandler,
}

/// Fan-out point for logger events.
///
/// Handlers run in registration order, before the event is broadcast.
/// They may (un)subscribe from inside a callback.
pub struct Notifier {
    events_tx: broadcast::Sender<LogEvent>,
    handlers: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl Notifier {
    /// Creates a notifier whose broadcast stream buffers `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (events_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            events_tx,
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `handler` for events of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.write().push(Registration {
            id,
            kind,
            handler: Arc::new(handler),
        });
        id
    }

    /// Removes a handler. Returns false if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|r| r.id != id);
        handlers.len() != before
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.read().iter().filter(|r| r.kind == kind).count()
    }

    /// Opens a new receiver on the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.events_tx.subscribe()
    }

    /// Delivers `event` to matching handlers, then to stream receivers.
    pub fn emit(&self, event: LogEvent) {
        let kind = event.kind();
        let matching: Vec<EventHandler> = self
            .handlers
            .read()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| Arc::clone(&r.handler))
            .collect();

        for handler in matching {
            handler(&event);
        }
        let _ = self.events_tx.send(event);
    }
}
