//! Store events and their kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of notifications a store emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// Whole-state replace or merge via `update`.
    Updated,
    ItemInserted,
    ItemUpdated,
    ItemRemoved,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Updated,
        EventKind::ItemInserted,
        EventKind::ItemUpdated,
        EventKind::ItemRemoved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Updated => "updated",
            EventKind::ItemInserted => "itemInserted",
            EventKind::ItemUpdated => "itemUpdated",
            EventKind::ItemRemoved => "itemRemoved",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind(pub String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// A committed mutation, as seen by subscribers.
///
/// `payload` is exactly what the caller passed to the mutation: the update
/// payload for `Updated`, the item for the item-level kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEvent {
    pub store: String,
    pub kind: EventKind,
    pub payload: Value,
}

impl StoreEvent {
    pub fn new(store: impl Into<String>, kind: EventKind, payload: Value) -> Self {
        Self {
            store: store.into(),
            kind,
            payload,
        }
    }

    /// Deserialize the payload into a typed value.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}
