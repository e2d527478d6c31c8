//! Opt-in maintenance operations for a registry.
//!
//! The core [`Registry`] API only ever adds cells, so its key set grows for the
//! lifetime of the registry. Collaborators that need to bound that growth can
//! import [`RegistryMaintenance`] to enumerate and remove keys.

use std::fmt;
use std::hash::Hash;

use crate::{Registry, RegistryEvent};

/// Key enumeration and removal for registries.
///
/// Removing a key drops its cell together with every thread's slot in it.
/// Cell handles obtained earlier keep their own cell alive, and a later `put`
/// under the same key creates a fresh, empty cell.
///
/// # Examples
///
/// ```rust
/// use thread_scoped_registry::{Registry, RegistryMaintenance};
///
/// let registry: Registry<u32, String> = Registry::new();
/// registry.put(1, "one".to_string());
/// registry.put(2, "two".to_string());
///
/// assert_eq!(registry.cell_count(), 2);
/// assert!(registry.remove(&1));
/// assert_eq!(registry.keys(), vec![2]);
/// ```
pub trait RegistryMaintenance<K> {
    /// Number of keys with a cell.
    fn cell_count(&self) -> usize;

    /// Snapshot of the keys with a cell, in unspecified order.
    fn keys(&self) -> Vec<K>;

    /// Removes the cell for `key`. Returns whether one existed.
    fn remove(&self, key: &K) -> bool;

    /// Whether no cell has been created (or all were removed).
    fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

impl<K, V> RegistryMaintenance<K> for Registry<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Send + Sync + 'static,
{
    fn cell_count(&self) -> usize {
        self.cells().read().len()
    }

    fn keys(&self) -> Vec<K> {
        self.cells().read().keys().cloned().collect()
    }

    fn remove(&self, key: &K) -> bool {
        let removed = self.cells().write().remove(key);
        let found = removed.is_some();
        drop(removed);

        if found {
            tracing::debug!(key = ?key, "removed thread cell");
        }
        self.emit_event(&RegistryEvent::Remove { key, found });

        found
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
