//! Thread-isolated storage cell.
//!
//! A [`ThreadCell`] holds at most one value per calling thread. The slots live
//! in a table keyed by [`ThreadId`]; a thread only ever reads or writes its own
//! entry, so no thread can observe another thread's value through the cell.
//!
//! # Examples
//!
//! ```
//! use thread_scoped_registry::ThreadCell;
//! use std::thread;
//!
//! let cell = ThreadCell::new();
//! cell.set("main".to_string());
//!
//! let other = cell.clone();
//! thread::spawn(move || assert!(other.get().is_none()))
//!     .join()
//!     .unwrap();
//!
//! assert_eq!(cell.get_cloned().as_deref(), Some("main"));
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

use dashmap::DashMap;

use crate::thread_exit::{self, Reclaim};
use crate::RegistryConfig;

/// Slot table shared by every handle of one cell.
struct SlotTable<V> {
    slots: DashMap<ThreadId, Arc<V>>,
    reclaim_on_exit: bool,
}

impl<V: Send + Sync + 'static> Reclaim for SlotTable<V> {
    fn reclaim(&self, thread: ThreadId) {
        self.slots.remove(&thread);
    }
}

/// A storage slot holding one value per calling thread.
///
/// Cloning a `ThreadCell` yields another handle to the same slots, so a handle
/// can be moved to other threads; each of them still only sees its own value.
pub struct ThreadCell<V> {
    table: Arc<SlotTable<V>>,
}

impl<V> Clone for ThreadCell<V> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<V> fmt::Debug for ThreadCell<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadCell")
            .field("occupied", &self.table.slots.len())
            .field("reclaim_on_exit", &self.table.reclaim_on_exit)
            .finish()
    }
}

impl<V: Send + Sync + 'static> Default for ThreadCell<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync + 'static> ThreadCell<V> {
    /// Creates an empty cell with default settings.
    pub fn new() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    /// Creates an empty cell using the slot settings of `config`.
    ///
    /// The config must already be validated; an invalid shard count panics inside dashmap.
    pub(crate) fn from_config(config: &RegistryConfig) -> Self {
        let slots = match config.slot_shards {
            Some(shards) => DashMap::with_shard_amount(shards),
            None => DashMap::new(),
        };
        Self {
            table: Arc::new(SlotTable {
                slots,
                reclaim_on_exit: config.reclaim_on_thread_exit,
            }),
        }
    }

    /// Returns the calling thread's value, if it stored one.
    pub fn get(&self) -> Option<Arc<V>> {
        self.table
            .slots
            .get(&thread::current().id())
            .map(|slot| Arc::clone(slot.value()))
    }

    /// Returns a clone of the calling thread's value.
    pub fn get_cloned(&self) -> Option<V>
    where
        V: Clone,
    {
        self.get().map(|value| (*value).clone())
    }

    /// Whether the calling thread has a value stored.
    pub fn is_set(&self) -> bool {
        self.table.slots.contains_key(&thread::current().id())
    }

    /// Stores `value` in the calling thread's slot, overwriting any previous value.
    pub fn set(&self, value: V) {
        self.set_arc(Arc::new(value));
    }

    /// Stores an `Arc`-wrapped value without re-wrapping it.
    pub fn set_arc(&self, value: Arc<V>) {
        let _previous = self.replace_arc(value);
    }

    /// Stores `value` and returns the value it displaced.
    pub fn replace(&self, value: V) -> Option<Arc<V>> {
        self.replace_arc(Arc::new(value))
    }

    fn replace_arc(&self, value: Arc<V>) -> Option<Arc<V>> {
        let previous = self.table.slots.insert(thread::current().id(), value);
        if previous.is_none() && self.table.reclaim_on_exit {
            let weak: Weak<dyn Reclaim> = Arc::downgrade(&self.table) as Weak<dyn Reclaim>;
            thread_exit::track(weak);
        }
        previous
    }

    /// Number of threads that currently hold a slot in this cell.
    ///
    /// Only the count is exposed; values stay private to their threads.
    pub fn occupied(&self) -> usize {
        self.table.slots.len()
    }

    /// Whether two handles refer to the same cell.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.table, &other.table)
    }
}
