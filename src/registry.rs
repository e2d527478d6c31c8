//! A keyed registry of thread-isolated storage cells.
//!
//! The registry maps each key to one [`ThreadCell`], created lazily on the first
//! `put` for that key and never replaced afterwards. Reads and writes are routed
//! to the calling thread's slot of that cell.
//!
//! # Examples
//!
//! ```
//! use thread_scoped_registry::Registry;
//! use std::sync::Arc;
//!
//! let registry: Registry<&str, String> = Registry::new();
//!
//! // Store a value for the calling thread
//! registry.put("conn-1", "handle-a".to_string());
//!
//! // Retrieve it from the same thread
//! let handle: Arc<String> = registry.get(&"conn-1").unwrap();
//! assert_eq!(&*handle, "handle-a");
//!
//! // Other threads see nothing under the same key
//! std::thread::scope(|s| {
//!     s.spawn(|| assert!(registry.get(&"conn-1").is_none()));
//! });
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{RegistryConfig, RegistryError, RegistryEvent, ThreadCell};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because the registry itself is shared.
pub type TraceCallback = dyn Fn(&RegistryEvent<'_>) + Send + Sync + 'static;

/// Keyed registry of per-thread storage cells.
///
/// `K` is compared through its `Eq` and `Hash` implementations; two keys that
/// compare equal address the same cell. Values are shared as `Arc<V>`.
pub struct Registry<K, V> {
    cells: RwLock<HashMap<K, ThreadCell<V>>>,
    config: RegistryConfig,
    trace: RwLock<Option<Arc<TraceCallback>>>,
}

impl<K, V> fmt::Debug for Registry<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.cells.read().keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for Registry<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Send + Sync + 'static,
{
    /// Creates an empty registry with default settings.
    pub fn new() -> Self {
        Self::build(RegistryConfig::default())
    }

    /// Creates an empty registry with the given settings.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidShardAmount`] if the slot shard count is invalid
    pub fn with_config(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RegistryConfig) -> Self {
        Self {
            cells: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            config,
            trace: RwLock::new(None),
        }
    }

    /// The settings this registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked after the map lock has been released, so it may
    /// call back into the registry.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent<'_>) + Send + Sync + 'static) {
        *self.trace.write() = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Stored values and cells are not affected.
    pub fn clear_trace_callback(&self) {
        *self.trace.write() = None;
    }

    pub(crate) fn emit_event(&self, event: &RegistryEvent<'_>) {
        let callback = self.trace.read().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------------------------------

    /// Returns a handle to the cell for `key`, if one has been created.
    pub fn cell<Q>(&self, key: &Q) -> Option<ThreadCell<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cells.read().get(key).cloned()
    }

    /// Returns the calling thread's value for `key`.
    ///
    /// Returns `None` if no cell exists for the key (none is created), or if the
    /// calling thread never stored a value in it.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let value = self.cell(key).and_then(|cell| cell.get());

        self.emit_event(&RegistryEvent::Get {
            key: &key,
            found: value.is_some(),
        });

        value
    }

    /// Returns a clone of the calling thread's value for `key`.
    pub fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
        V: Clone,
    {
        self.get(key).map(|value| (*value).clone())
    }

    /// Like [`get`](Self::get), but reports why nothing was found.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::KeyNotFound`] if no cell exists for the key
    /// - [`RegistryError::SlotEmpty`] if the calling thread never stored a value in it
    pub fn try_get<Q>(&self, key: &Q) -> Result<Arc<V>, RegistryError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let result = match self.cell(key) {
            Some(cell) => cell.get().ok_or_else(|| RegistryError::SlotEmpty {
                key: format!("{key:?}"),
            }),
            None => Err(RegistryError::KeyNotFound {
                key: format!("{key:?}"),
            }),
        };

        self.emit_event(&RegistryEvent::Get {
            key: &key,
            found: result.is_ok(),
        });

        result
    }

    /// Checks whether a cell exists for `key`, regardless of which threads stored values.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let found = self.cells.read().contains_key(key);

        self.emit_event(&RegistryEvent::Contains { key: &key, found });

        found
    }

    /// Stores `value` in the calling thread's slot for `key`.
    ///
    /// The cell for a never-seen key is created exactly once, even when many
    /// threads race to store under it; every racer ends up writing into the
    /// winner's cell.
    pub fn put(&self, key: K, value: V) {
        self.put_arc(key, Arc::new(value));
    }

    /// Stores an `Arc`-wrapped value in the calling thread's slot for `key`.
    pub fn put_arc(&self, key: K, value: Arc<V>) {
        let (cell, created) = self.cell_or_create(&key);
        cell.set_arc(value);

        self.emit_event(&RegistryEvent::Put { key: &key, created });
    }

    /// Returns the calling thread's value for `key`, storing `init()` first if absent.
    ///
    /// `init` runs on the calling thread without any registry lock held.
    pub fn get_or_put_with(&self, key: K, init: impl FnOnce() -> V) -> Arc<V> {
        let (cell, created) = self.cell_or_create(&key);
        if let Some(value) = cell.get() {
            self.emit_event(&RegistryEvent::Get {
                key: &key,
                found: true,
            });
            return value;
        }

        let value = Arc::new(init());
        cell.set_arc(Arc::clone(&value));

        self.emit_event(&RegistryEvent::Put { key: &key, created });

        value
    }

    /// Looks up the cell for `key`, creating it if needed.
    ///
    /// Only the creation path takes the exclusive lock. The second lookup under
    /// the write lock makes the first writer win a creation race.
    fn cell_or_create(&self, key: &K) -> (ThreadCell<V>, bool) {
        if let Some(cell) = self.cells.read().get(key) {
            return (cell.clone(), false);
        }

        let cell = {
            let mut cells = self.cells.write();
            if let Some(cell) = cells.get(key) {
                return (cell.clone(), false);
            }
            let cell = ThreadCell::from_config(&self.config);
            cells.insert(key.clone(), cell.clone());
            cell
        };

        tracing::debug!(key = ?key, "created thread cell");
        self.emit_event(&RegistryEvent::CellCreated { key });

        (cell, true)
    }

    /// Disposes the registry, dropping every cell and the slots they hold.
    ///
    /// Cell handles obtained through [`cell`](Self::cell) keep their own cell
    /// alive. Returns the number of cells the registry released.
    pub fn close(self) -> usize {
        let cells = std::mem::take(&mut *self.cells.write());
        let count = cells.len();
        drop(cells);

        tracing::debug!(cells = count, "closed registry");
        self.emit_event(&RegistryEvent::Close { cells: count });

        count
    }

    pub(crate) fn cells(&self) -> &RwLock<HashMap<K, ThreadCell<V>>> {
        &self.cells
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
