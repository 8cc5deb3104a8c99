//! ItemRepository - typed accessor for the items of a collection store.

use std::marker::PhantomData;

use super::Keyed;
use crate::error::{HandlerError, StoreError};
use crate::event::EventKind;
use crate::store::{ObservableStore, Subscription};

/// Typed wrapper around a collection store whose items are `M`.
pub struct ItemRepository<M> {
    store: ObservableStore,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Clone for ItemRepository<M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M> std::fmt::Debug for ItemRepository<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRepository")
            .field("store", &self.store)
            .finish()
    }
}

impl<M: Keyed> ItemRepository<M> {
    pub(crate) fn new(store: ObservableStore) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// The underlying untyped store.
    pub fn store(&self) -> &ObservableStore {
        &self.store
    }

    /// Get an item by key.
    pub fn get(&self, key: &M::Key) -> Result<Option<M>, StoreError> {
        let key = serde_json::to_value(key)?;
        self.store
            .get_item(&key)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    /// All items, in collection order.
    pub fn all(&self) -> Result<Vec<M>, StoreError> {
        self.find(&|_| true)
    }

    /// Items matching a predicate, in collection order.
    pub fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, StoreError> {
        let decoded = self.store.read(|state| {
            state.as_array().map(|items| {
                items
                    .iter()
                    .map(|item| M::deserialize(item))
                    .collect::<Result<Vec<M>, _>>()
            })
        })?;

        let items = decoded.ok_or_else(|| self.store.invalid_shape("find"))??;
        Ok(items.into_iter().filter(|item| predicate(item)).collect())
    }

    /// Append an item. Key collisions are not checked.
    pub fn insert(&self, item: &M) -> Result<(), StoreError> {
        self.store.insert_item(serde_json::to_value(item)?)
    }

    /// Replace the item with the same key in place. Returns whether it existed.
    pub fn update(&self, item: &M) -> Result<bool, StoreError> {
        self.store.update_item(serde_json::to_value(item)?)
    }

    /// Remove the item with the same key. Returns whether it existed.
    pub fn remove(&self, item: &M) -> Result<bool, StoreError> {
        self.store.remove_item(serde_json::to_value(item)?)
    }

    /// Replace the whole collection.
    pub fn replace_all(&self, items: &[M]) -> Result<(), StoreError> {
        self.store.update(serde_json::to_value(items)?)
    }

    /// Watch an item-level event kind with a typed handler.
    ///
    /// [`EventKind::Updated`] carries a whole collection rather than one
    /// item; use [`ItemRepository::watch_replaced`] for it.
    pub fn watch<F>(&self, kind: EventKind, handler: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&M) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.store.watch(kind, move |event| {
            let item: M = event
                .decode()
                .map_err(|e| HandlerError::new(format!("failed to decode {}: {}", M::STORE, e)))?;
            handler(&item)
        })
    }

    /// Watch whole-collection replacements with a typed handler.
    pub fn watch_replaced<F>(&self, handler: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&[M]) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.store.watch(EventKind::Updated, move |event| {
            let items: Vec<M> = event
                .decode()
                .map_err(|e| HandlerError::new(format!("failed to decode {}: {}", M::STORE, e)))?;
            handler(&items)
        })
    }
}
