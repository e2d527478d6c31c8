//! Construction-time settings for a [`Registry`](crate::Registry).

use crate::RegistryError;

/// Settings applied when a registry and its cells are created.
///
/// ```rust
/// use thread_scoped_registry::{Registry, RegistryConfig};
///
/// let config = RegistryConfig::default()
///     .with_initial_capacity(64)
///     .with_slot_shards(8);
/// let registry: Registry<String, u64> = Registry::with_config(config).unwrap();
/// assert!(registry.get("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Number of keys the map is pre-sized for.
    pub initial_capacity: usize,
    /// Shard count of every cell's slot table. `None` keeps the dashmap default.
    pub slot_shards: Option<usize>,
    /// Drop a thread's slots when that thread exits.
    pub reclaim_on_thread_exit: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            slot_shards: None,
            reclaim_on_thread_exit: true,
        }
    }
}

impl RegistryConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_slot_shards(mut self, shards: usize) -> Self {
        self.slot_shards = Some(shards);
        self
    }

    pub fn with_reclaim_on_thread_exit(mut self, reclaim: bool) -> Self {
        self.reclaim_on_thread_exit = reclaim;
        self
    }

    /// Checks the settings that dashmap would otherwise reject with a panic.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidShardAmount`] if `slot_shards` is not a power of two
    ///   greater than 1
    pub fn validate(&self) -> Result<(), RegistryError> {
        match self.slot_shards {
            Some(shards) if shards <= 1 || !shards.is_power_of_two() => {
                Err(RegistryError::InvalidShardAmount { shards })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.initial_capacity, 0);
        assert_eq!(config.slot_shards, None);
        assert!(config.reclaim_on_thread_exit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_setters_chain() {
        let config = RegistryConfig::default()
            .with_initial_capacity(16)
            .with_slot_shards(4)
            .with_reclaim_on_thread_exit(false);
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.slot_shards, Some(4));
        assert!(!config.reclaim_on_thread_exit);
    }

    #[test]
    fn test_validate_rejects_bad_shards() {
        for shards in [0, 1, 3, 12] {
            let config = RegistryConfig::default().with_slot_shards(shards);
            assert_eq!(
                config.validate(),
                Err(RegistryError::InvalidShardAmount { shards })
            );
        }
    }

    #[test]
    fn test_validate_accepts_powers_of_two() {
        for shards in [2, 4, 64] {
            assert!(RegistryConfig::default()
                .with_slot_shards(shards)
                .validate()
                .is_ok());
        }
    }
}
