//! StoreRegistry - one store per name, shared by everything holding the registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::StoreError;
use crate::keyed::{ItemRepository, Keyed};
use crate::store::{ObservableStore, StoreConfig};

/// Maps store names to store instances.
///
/// Pass the registry (or a clone of it, which shares the same table) to the
/// parts of the application that need stores. A name is bound to one store
/// for the lifetime of the registry: initializing an existing name keeps the
/// original store and its current state.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: Arc<RwLock<HashMap<String, ObservableStore>>>,
}

impl StoreRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store under `name` unless one already exists.
    ///
    /// `key_field` defaults to `"id"`. Returns the store bound to `name`,
    /// which is the pre-existing one if `name` was already initialized.
    pub fn init_store(
        &self,
        name: &str,
        initial: Value,
        key_field: Option<&str>,
    ) -> Result<ObservableStore, StoreError> {
        let mut config = StoreConfig::default();
        if let Some(key_field) = key_field {
            config = config.with_key_field(key_field);
        }
        self.init_store_with(name, initial, config)
    }

    /// Same as [`StoreRegistry::init_store`] with a full configuration.
    ///
    /// The configuration is ignored when `name` already exists.
    pub fn init_store_with(
        &self,
        name: &str,
        initial: Value,
        config: StoreConfig,
    ) -> Result<ObservableStore, StoreError> {
        let mut stores = self
            .stores
            .write()
            .map_err(|_| StoreError::LockPoisoned("init_store"))?;

        if let Some(existing) = stores.get(name) {
            tracing::trace!(store = name, "store already initialized");
            return Ok(existing.clone());
        }

        let store = ObservableStore::with_config(name, initial, config);
        tracing::debug!(store = name, key_field = store.key_field(), "store initialized");
        stores.insert(name.to_string(), store.clone());
        Ok(store)
    }

    /// Register a collection store for `M` under `M::STORE`, keyed by `M::KEY_FIELD`.
    pub fn init_collection<M: Keyed>(&self, items: Vec<M>) -> Result<ItemRepository<M>, StoreError> {
        let initial = serde_json::to_value(items)?;
        let config = StoreConfig::default().with_key_field(M::KEY_FIELD);
        self.init_store_with(M::STORE, initial, config)?.items::<M>()
    }

    /// Look up a store by name.
    pub fn get_store(&self, name: &str) -> Result<Option<ObservableStore>, StoreError> {
        let stores = self
            .stores
            .read()
            .map_err(|_| StoreError::LockPoisoned("get_store"))?;
        Ok(stores.get(name).cloned())
    }

    /// Typed access to the collection store registered for `M`.
    pub fn items<M: Keyed>(&self) -> Result<Option<ItemRepository<M>>, StoreError> {
        self.get_store(M::STORE)?
            .map(|store| store.items::<M>())
            .transpose()
    }

    /// Whether a store has been initialized under `name`.
    pub fn existed(&self, name: &str) -> Result<bool, StoreError> {
        let stores = self
            .stores
            .read()
            .map_err(|_| StoreError::LockPoisoned("existed"))?;
        Ok(stores.contains_key(name))
    }

    /// Registered store names, sorted.
    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        let stores = self
            .stores
            .read()
            .map_err(|_| StoreError::LockPoisoned("names"))?;
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Number of registered stores.
    pub fn len(&self) -> Result<usize, StoreError> {
        let stores = self
            .stores
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(stores.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl std::fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("store_count", &self.len().ok())
            .finish()
    }
}
