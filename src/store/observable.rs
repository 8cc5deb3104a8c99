//! ObservableStore - a named, in-memory state container with synchronous change events.

use std::fmt;
use std::sync::{Arc, RwLock};

use parking_lot::ReentrantMutex;
use serde_json::Value;

use super::config::{DispatchPolicy, MissPolicy, StoreConfig};
use super::subscription::{Handler, Subscribers, Subscription};
use crate::error::{HandlerError, StoreError};
use crate::event::{EventKind, StoreEvent};
use crate::key;
use crate::keyed::{ItemRepository, Keyed};

struct Inner {
    name: String,
    config: StoreConfig,
    state: RwLock<Value>,
    subscribers: Arc<RwLock<Subscribers>>,
    /// Serializes commit + dispatch across threads. Re-entrant so a handler
    /// may mutate the store it is being notified by.
    gate: ReentrantMutex<()>,
}

/// A named piece of application state with change notification.
///
/// State is any JSON value. An array is treated as a keyed collection and
/// unlocks the item-level operations; anything else is plain state that
/// `update` merges into (objects) or replaces.
///
/// Every mutation commits first, then synchronously notifies the
/// subscribers of its event kind. Clone-friendly via Arc: clones share state
/// and subscribers.
///
/// # Example
///
/// ```
/// use observable_store::{EventKind, ObservableStore};
/// use serde_json::json;
///
/// let store = ObservableStore::new("tickets", json!([]));
/// let _sub = store
///     .watch(EventKind::ItemInserted, |event| {
///         println!("inserted {}", event.payload);
///         Ok(())
///     })
///     .unwrap();
///
/// store.insert_item(json!({"id": 1, "status": "open"})).unwrap();
/// assert_eq!(store.get_item(&json!(1)).unwrap(), Some(json!({"id": 1, "status": "open"})));
/// ```
#[derive(Clone)]
pub struct ObservableStore {
    inner: Arc<Inner>,
}

impl ObservableStore {
    /// Create a store keyed by `"id"` with default policies.
    pub fn new(name: impl Into<String>, initial: Value) -> Self {
        Self::with_config(name, initial, StoreConfig::default())
    }

    pub fn with_config(name: impl Into<String>, initial: Value, config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                config,
                state: RwLock::new(initial),
                subscribers: Arc::new(RwLock::new(Subscribers::default())),
                gate: ReentrantMutex::new(()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn key_field(&self) -> &str {
        self.inner.config.key_field()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Snapshot of the current state.
    ///
    /// The returned value is a copy; changing it does not affect the store.
    pub fn current(&self) -> Result<Value, StoreError> {
        self.read(Value::clone)
    }

    /// Borrow the current state without copying it.
    ///
    /// The state lock is held while `f` runs, so `f` must not mutate this store.
    pub fn read<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&Value) -> R,
    {
        let state = self
            .inner
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(f(&state))
    }

    /// Whether the state is currently a collection (a JSON array).
    pub fn is_collection(&self) -> Result<bool, StoreError> {
        self.read(Value::is_array)
    }

    /// Number of items in a collection store.
    pub fn item_count(&self) -> Result<usize, StoreError> {
        self.read(|state| state.as_array().map(Vec::len))?
            .ok_or_else(|| self.invalid_shape("item_count"))
    }

    /// First item whose key field loosely equals `key`.
    ///
    /// Returns `None` when nothing matches or when the state is not a collection.
    pub fn get_item(&self, key: &Value) -> Result<Option<Value>, StoreError> {
        let key_field = self.key_field();
        self.read(|state| {
            let items = state.as_array()?;
            key::position(items, key_field, key).map(|i| items[i].clone())
        })
    }

    /// Replace or merge the whole state, then emit [`EventKind::Updated`].
    ///
    /// - collection state: `payload` must be an array and becomes the new collection;
    /// - object state with an object payload: shallow merge, payload keys win;
    /// - anything else: `payload` replaces the state.
    pub fn update(&self, payload: Value) -> Result<(), StoreError> {
        let _gate = self.inner.gate.lock();
        {
            let mut state = self.write_state("update")?;
            match (&mut *state, &payload) {
                (Value::Array(items), Value::Array(replacement)) => {
                    *items = replacement.clone();
                }
                (Value::Array(_), _) => return Err(self.invalid_shape("update")),
                (Value::Object(current), Value::Object(patch)) => {
                    for (field, value) in patch {
                        current.insert(field.clone(), value.clone());
                    }
                }
                (state, payload) => *state = payload.clone(),
            }
        }
        tracing::trace!(store = %self.name(), "state updated");

        self.dispatch(EventKind::Updated, payload)
    }

    /// Append `item` to the collection, then emit [`EventKind::ItemInserted`].
    ///
    /// Key collisions are not checked.
    pub fn insert_item(&self, item: Value) -> Result<(), StoreError> {
        let _gate = self.inner.gate.lock();
        {
            let mut state = self.write_state("insert_item")?;
            let items = state
                .as_array_mut()
                .ok_or_else(|| self.invalid_shape("insert_item"))?;
            self.require_key(&item)?;
            items.push(item.clone());
        }
        tracing::trace!(store = %self.name(), "item inserted");

        self.dispatch(EventKind::ItemInserted, item)
    }

    /// Replace the first item with the same key, keeping its position.
    ///
    /// Returns whether an item matched. A miss changes nothing; whether it
    /// still emits [`EventKind::ItemUpdated`] is decided by [`MissPolicy`].
    pub fn update_item(&self, item: Value) -> Result<bool, StoreError> {
        let _gate = self.inner.gate.lock();
        let matched = {
            let mut state = self.write_state("update_item")?;
            let items = state
                .as_array_mut()
                .ok_or_else(|| self.invalid_shape("update_item"))?;
            let key = self.require_key(&item)?;
            match key::position(items, self.key_field(), key) {
                Some(index) => {
                    items[index] = item.clone();
                    true
                }
                None => false,
            }
        };
        tracing::trace!(store = %self.name(), matched, "item updated");

        self.dispatch_item(EventKind::ItemUpdated, item, matched)?;
        Ok(matched)
    }

    /// Remove the first item with the same key.
    ///
    /// Returns whether an item matched. A miss leaves the collection untouched;
    /// whether it still emits [`EventKind::ItemRemoved`] is decided by [`MissPolicy`].
    pub fn remove_item(&self, item: Value) -> Result<bool, StoreError> {
        let _gate = self.inner.gate.lock();
        let matched = {
            let mut state = self.write_state("remove_item")?;
            let items = state
                .as_array_mut()
                .ok_or_else(|| self.invalid_shape("remove_item"))?;
            let key = self.require_key(&item)?;
            match key::position(items, self.key_field(), key) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            }
        };
        tracing::trace!(store = %self.name(), matched, "item removed");

        self.dispatch_item(EventKind::ItemRemoved, item, matched)?;
        Ok(matched)
    }

    /// Register `handler` for `kind`.
    ///
    /// Handlers run synchronously on the mutating thread, after the state
    /// change is visible through [`ObservableStore::current`]. The returned
    /// [`Subscription`] removes the handler when dropped.
    pub fn watch<F>(&self, kind: EventKind, handler: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&StoreEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let id = self
            .inner
            .subscribers
            .write()
            .map_err(|_| StoreError::LockPoisoned("watch"))?
            .add(kind, handler);
        tracing::debug!(store = %self.name(), %kind, id, "subscriber registered");

        Ok(Subscription::new(kind, id, &self.inner.subscribers))
    }

    pub fn subscriber_count(&self, kind: EventKind) -> Result<usize, StoreError> {
        let subscribers = self
            .inner
            .subscribers
            .read()
            .map_err(|_| StoreError::LockPoisoned("subscriber_count"))?;
        Ok(subscribers.count(kind))
    }

    /// Typed access to the items of a collection store.
    ///
    /// Fails with [`StoreError::KeyFieldMismatch`] when the store is keyed by
    /// a different field than `M`.
    pub fn items<M: Keyed>(&self) -> Result<ItemRepository<M>, StoreError> {
        if self.key_field() != M::KEY_FIELD {
            return Err(StoreError::KeyFieldMismatch {
                store: self.name().to_string(),
                expected: M::KEY_FIELD.to_string(),
                actual: self.key_field().to_string(),
            });
        }
        Ok(ItemRepository::new(self.clone()))
    }

    fn write_state(
        &self,
        operation: &'static str,
    ) -> Result<std::sync::RwLockWriteGuard<'_, Value>, StoreError> {
        self.inner
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn require_key<'a>(&self, item: &'a Value) -> Result<&'a Value, StoreError> {
        key::key_of(item, self.key_field()).ok_or_else(|| StoreError::MissingKey {
            store: self.name().to_string(),
            key_field: self.key_field().to_string(),
        })
    }

    pub(crate) fn invalid_shape(&self, operation: &'static str) -> StoreError {
        StoreError::InvalidStateShape {
            store: self.name().to_string(),
            operation,
        }
    }

    fn dispatch_item(&self, kind: EventKind, item: Value, matched: bool) -> Result<(), StoreError> {
        if matched || self.inner.config.miss_policy() == MissPolicy::Emit {
            self.dispatch(kind, item)
        } else {
            Ok(())
        }
    }

    /// Notify the handlers registered for `kind` at this moment.
    fn dispatch(&self, kind: EventKind, payload: Value) -> Result<(), StoreError> {
        let handlers = self
            .inner
            .subscribers
            .read()
            .map_err(|_| StoreError::LockPoisoned("dispatch"))?
            .snapshot(kind);
        if handlers.is_empty() {
            return Ok(());
        }

        let event = StoreEvent::new(self.name(), kind, payload);
        for handler in handlers {
            let Err(err) = handler(&event) else {
                continue;
            };
            match self.inner.config.dispatch() {
                DispatchPolicy::Propagate => {
                    return Err(StoreError::Subscriber {
                        store: self.name().to_string(),
                        kind,
                        message: err.to_string(),
                    });
                }
                DispatchPolicy::Isolate => {
                    tracing::warn!(store = %self.name(), %kind, error = %err, "subscriber failed");
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ObservableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableStore")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .finish()
    }
}
