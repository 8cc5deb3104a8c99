use std::fmt;

use crate::event::EventKind;

/// Error type for store and registry operations.
///
/// Lookup misses are not errors: they surface as `Ok(None)` or `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An item-level operation was called on a store whose state is not a collection,
    /// or a collection was replaced with a non-array payload.
    InvalidStateShape {
        store: String,
        operation: &'static str,
    },
    /// The item passed to an item-level operation has no value under the key field.
    MissingKey { store: String, key_field: String },
    /// Typed access was requested with an item type keyed by a different field than the store.
    KeyFieldMismatch {
        store: String,
        expected: String,
        actual: String,
    },
    /// A subscriber returned an error while the store was dispatching.
    Subscriber {
        store: String,
        kind: EventKind,
        message: String,
    },
    /// Serialization/deserialization error in the typed item layer.
    Serde(String),
    /// An internal lock was poisoned by a panicking thread.
    LockPoisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidStateShape { store, operation } => write!(
                f,
                "store {} does not hold a collection (operation: {})",
                store, operation
            ),
            StoreError::MissingKey { store, key_field } => {
                write!(f, "item for store {} has no key field `{}`", store, key_field)
            }
            StoreError::KeyFieldMismatch {
                store,
                expected,
                actual,
            } => write!(
                f,
                "store {} is keyed by `{}`, item type expects `{}`",
                store, actual, expected
            ),
            StoreError::Subscriber {
                store,
                kind,
                message,
            } => write!(
                f,
                "subscriber failed on {} event of store {}: {}",
                kind, store, message
            ),
            StoreError::Serde(msg) => write!(f, "store serialization error: {}", msg),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Error returned by a subscriber to abort the current dispatch round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HandlerError {}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError(message.to_string())
    }
}
