//! Observable stores - named state containers with synchronous change events.
//!
//! ## Architecture
//!
//! ```text
//! ObservableStore (Clone, shares Arc<Inner>)
//!     │
//!     ├── state: RwLock<serde_json::Value>     array = keyed collection
//!     │
//!     ├── subscribers: EventKind -> [(id, handler)]
//!     │       │
//!     │       └── Subscription (drop = unsubscribe)
//!     │
//!     └── gate: ReentrantMutex                 one commit + dispatch at a time
//! ```
//!
//! A mutation takes the gate, commits under the state write lock, releases
//! the state lock, then calls the handlers of its event kind in registration
//! order.

mod config;
mod observable;
mod subscription;

pub use config::{DispatchPolicy, MissPolicy, StoreConfig};
pub use observable::ObservableStore;
pub use subscription::Subscription;
