use std::fmt;

/// Events emitted by a [`Registry`](crate::Registry) during operations.
///
/// These events are passed to the tracing callback set via
/// [`Registry::set_trace_callback`](crate::Registry::set_trace_callback).
/// Keys are borrowed for the duration of the callback and rendered with their
/// `Debug` implementation, so emitting an event never allocates.
///
/// # Examples
///
/// ```rust
/// use thread_scoped_registry::RegistryEvent;
///
/// let key = "conn-1";
/// let event = RegistryEvent::Get { key: &key, found: false };
/// assert_eq!(event.to_string(), "get { key: \"conn-1\", found: false }");
/// ```
#[derive(Debug, Clone, Copy)]
pub enum RegistryEvent<'a> {
    /// A cell was created for a key seen for the first time.
    CellCreated {
        /// The key the cell was created for
        key: &'a dyn fmt::Debug,
    },

    /// A value was stored in the calling thread's slot.
    Put {
        /// The key the value was stored under
        key: &'a dyn fmt::Debug,
        /// Whether this call created the key's cell
        created: bool,
    },

    /// A value was requested by the calling thread.
    Get {
        /// The key that was requested
        key: &'a dyn fmt::Debug,
        /// Whether the calling thread had a value stored
        found: bool,
    },

    /// A key existence check was performed.
    Contains {
        /// The key that was checked
        key: &'a dyn fmt::Debug,
        /// Whether a cell exists for the key
        found: bool,
    },

    /// A cell was removed through the maintenance API.
    Remove {
        /// The key that was removed
        key: &'a dyn fmt::Debug,
        /// Whether a cell existed for the key
        found: bool,
    },

    /// The registry was closed.
    Close {
        /// Number of cells released
        cells: usize,
    },
}

impl fmt::Display for RegistryEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::CellCreated { key } => {
                write!(f, "cell_created {{ key: {key:?} }}")
            }
            RegistryEvent::Put { key, created } => {
                write!(f, "put {{ key: {key:?}, created: {created} }}")
            }
            RegistryEvent::Get { key, found } => {
                write!(f, "get {{ key: {key:?}, found: {found} }}")
            }
            RegistryEvent::Contains { key, found } => {
                write!(f, "contains {{ key: {key:?}, found: {found} }}")
            }
            RegistryEvent::Remove { key, found } => {
                write!(f, "remove {{ key: {key:?}, found: {found} }}")
            }
            RegistryEvent::Close { cells } => write!(f, "Closing the Registry ({cells} cells)"),
        }
    }
}
