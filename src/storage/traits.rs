//! Storage trait definitions.

use crate::error::Result;

/// Durable key-value slot storage.
///
/// Each call is atomic on its own; there is no transaction spanning calls.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}
