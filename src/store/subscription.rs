//! Subscriber bookkeeping and the `Subscription` token.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::error::HandlerError;
use crate::event::{EventKind, StoreEvent};

pub(crate) type Handler = Arc<dyn Fn(&StoreEvent) -> Result<(), HandlerError> + Send + Sync>;

/// Handlers per event kind, each under a unique subscription id.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    handlers: HashMap<EventKind, Vec<(u64, Handler)>>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, kind: EventKind, handler: Handler) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.handlers.entry(kind).or_default().push((id, handler));
        id
    }

    pub(crate) fn remove(&mut self, kind: EventKind, id: u64) -> bool {
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Handlers registered for `kind`, in registration order.
    pub(crate) fn snapshot(&self, kind: EventKind) -> Vec<Handler> {
        self.handlers
            .get(&kind)
            .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

/// Handle to a registered subscriber.
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes the
/// handler from its store. Call [`Subscription::detach`] to keep the handler
/// registered for the lifetime of the store instead.
#[must_use = "dropping a Subscription immediately removes the handler"]
pub struct Subscription {
    kind: EventKind,
    id: u64,
    subscribers: Weak<RwLock<Subscribers>>,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(kind: EventKind, id: u64, subscribers: &Arc<RwLock<Subscribers>>) -> Self {
        Self {
            kind,
            id,
            subscribers: Arc::downgrade(subscribers),
            active: true,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the handler now. Returns whether it was still registered.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    /// Leave the handler registered and drop the handle.
    pub fn detach(mut self) {
        self.active = false;
    }

    fn release(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }
        let Some(subscribers) = self.subscribers.upgrade() else {
            return false;
        };
        // Poisoned: the handler stays registered.
        let removed = match subscribers.write() {
            Ok(mut subscribers) => subscribers.remove(self.kind, self.id),
            Err(_) => false,
        };
        if removed {
            tracing::trace!(kind = %self.kind, id = self.id, "subscriber removed");
        }
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
