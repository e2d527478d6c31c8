//! # Thread Scoped Registry
//!
//! A keyed registry of thread-isolated storage cells, used by resource managers
//! to stash and retrieve thread-private values (for example pooled connection
//! handles) by an arbitrary key.
//!
//! Each key owns one [`ThreadCell`], created lazily and exactly once. A value
//! stored under a key is visible only to the thread that stored it.
//!
//! ## Quick Start
//!
//! ```rust
//! use thread_scoped_registry::Registry;
//! use std::sync::Arc;
//!
//! let registry: Registry<&str, u32> = Registry::new();
//!
//! // Store a handle for the calling thread
//! registry.put("conn-1", 7);
//!
//! // Retrieve it from the same thread
//! let handle: Arc<u32> = registry.get(&"conn-1").unwrap();
//! assert_eq!(*handle, 7);
//!
//! // Another thread does not see it
//! std::thread::scope(|s| {
//!     s.spawn(|| assert!(registry.get(&"conn-1").is_none()));
//! });
//! ```
//!
//! ## Features
//!
//! - **Thread-isolated**: values never cross thread boundaries through a cell
//! - **Exactly-once cells**: racing first writers on a key share one cell
//! - **Non-blocking lookups**: only cell creation takes the exclusive map lock
//! - **Thread-exit reclamation**: a thread's slots are dropped when it exits
//! - **Tracing support**: callback events plus `tracing` diagnostics
//!
//! ## Main Types
//!
//! - [`Registry`] - key to cell map with `get` / `put`
//! - [`ThreadCell`] - per-thread slot for one key
//! - [`RegistryConfig`] - construction settings
//! - [`RegistryMaintenance`] - opt-in key enumeration and removal
//! - [`RegistryEvent`] - events passed to the trace callback

mod registry;
mod registry_config;
mod registry_error;
mod registry_event;
mod registry_trait;
mod thread_cell;
mod thread_exit;

// Re-export the main public API
pub use registry::{Registry, TraceCallback};
pub use registry_config::RegistryConfig;
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use registry_trait::RegistryMaintenance;
pub use thread_cell::ThreadCell;
