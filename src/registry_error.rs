use thiserror::Error;

/// Errors reported by the diagnostic and configuration entry points.
///
/// The core `get`/`put` operations never fail; absence is reported as `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No cell has ever been created for the key.
    #[error("No cell registered for key: {key}")]
    KeyNotFound { key: String },

    /// A cell exists for the key, but the calling thread never stored a value in it.
    #[error("Calling thread has no value stored for key: {key}")]
    SlotEmpty { key: String },

    /// Slot tables are sharded; the shard count must be a power of two greater than 1.
    #[error("Invalid slot shard amount: {shards} (must be a power of two greater than 1)")]
    InvalidShardAmount { shards: usize },
}
