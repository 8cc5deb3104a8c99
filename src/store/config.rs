//! Per-store configuration.

/// What happens when a subscriber returns an error during dispatch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Stop the dispatch round and return the error from the mutation call.
    /// The state change stays committed; later subscribers are not notified.
    #[default]
    Propagate,
    /// Log the failure and keep notifying the remaining subscribers.
    Isolate,
}

/// Whether `update_item` / `remove_item` emit their event when no item matched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    /// Emit for every attempt, matched or not.
    #[default]
    Emit,
    /// Emit only when an item was actually updated or removed.
    Skip,
}

/// Configuration for a single store.
///
/// Defaults: key field `"id"`, [`DispatchPolicy::Propagate`], [`MissPolicy::Emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    key_field: String,
    dispatch: DispatchPolicy,
    miss: MissPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_field: "id".to_string(),
            dispatch: DispatchPolicy::default(),
            miss: MissPolicy::default(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute used to identify collection items.
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Set the subscriber failure policy.
    pub fn with_dispatch(mut self, dispatch: DispatchPolicy) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Set whether item-level misses still emit events.
    pub fn with_miss_policy(mut self, miss: MissPolicy) -> Self {
        self.miss = miss;
        self
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn dispatch(&self) -> DispatchPolicy {
        self.dispatch
    }

    pub fn miss_policy(&self) -> MissPolicy {
        self.miss
    }
}
