//! Named, in-memory observable stores.
//!
//! - [`ObservableStore`] holds one piece of state (any JSON value, or a keyed
//!   collection when the state is an array) and notifies subscribers
//!   synchronously after every committed mutation.
//! - [`StoreRegistry`] binds each store name to a single store instance.
//! - [`Keyed`] (derivable) and [`ItemRepository`] give typed access to the
//!   items of a collection store.
//!
//! ## Example
//!
//! ```
//! use observable_store::{EventKind, StoreRegistry};
//! use serde_json::json;
//!
//! let registry = StoreRegistry::new();
//! let tickets = registry.init_store("tickets", json!([]), Some("id")).unwrap();
//!
//! let sub = tickets
//!     .watch(EventKind::ItemUpdated, |event| {
//!         println!("{} changed: {}", event.store, event.payload);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! tickets.insert_item(json!({"id": 1, "status": "open"})).unwrap();
//! tickets.insert_item(json!({"id": 2, "status": "open"})).unwrap();
//! tickets.update_item(json!({"id": 1, "status": "closed"})).unwrap();
//! sub.unsubscribe();
//!
//! assert_eq!(
//!     tickets.current().unwrap(),
//!     json!([{"id": 1, "status": "closed"}, {"id": 2, "status": "open"}])
//! );
//! ```

extern crate self as observable_store;

mod error;
mod event;
mod key;
pub mod keyed;
mod registry;
pub mod store;

pub use error::{HandlerError, StoreError};
pub use event::{EventKind, StoreEvent, UnknownEventKind};
pub use key::keys_match;
pub use keyed::{ItemRepository, Keyed};
pub use registry::StoreRegistry;
pub use store::{DispatchPolicy, MissPolicy, ObservableStore, StoreConfig, Subscription};

// Re-export derive macros
pub use observable_store_macros::Keyed;
