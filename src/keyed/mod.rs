//! Keyed items - compile-time typed access to collection stores.
//!
//! A collection store holds JSON items identified by a key field. The
//! [`Keyed`] trait ties a Rust struct to that layout: which store it lives in
//! and which serialized field identifies it.
//!
//! ## Example
//!
//! ```ignore
//! use observable_store::{Keyed, StoreRegistry};
//!
//! #[derive(Clone, Serialize, Deserialize, Keyed)]
//! #[keyed(store = "tickets")]
//! struct Ticket {
//!     #[keyed(key)]
//!     pub id: u64,
//!     pub status: String,
//! }
//!
//! let registry = StoreRegistry::new();
//! let tickets = registry.init_collection::<Ticket>(vec![])?;
//! tickets.insert(&Ticket { id: 1, status: "open".into() })?;
//! let loaded = tickets.get(&1)?;
//! ```

mod repository;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be stored as items of a collection store.
pub trait Keyed: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the store holding items of this type (e.g. "tickets").
    const STORE: &'static str;

    /// Serialized name of the identity field.
    const KEY_FIELD: &'static str;

    type Key: Serialize;

    /// Returns the identity of this item.
    fn key(&self) -> &Self::Key;
}

pub use repository::ItemRepository;
