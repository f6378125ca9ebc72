//! Key/value persistence used by the session layer. Values are opaque strings;
//! callers own their encoding. Single-key operations are atomic, multi-key
//! updates are not, so a reader may observe the token written before the user.
//!
//! Two backends ship with the crate: [`FileStorage`] survives process restarts
//! (the durable store holding `token` and `user`), and [`MemoryStorage`] lives
//! only as long as the process (the tab-scoped store holding one-shot markers).

mod file;
mod memory;

pub use file::{FileStorage, STORAGE_FILE};
pub use memory::MemoryStorage;

/// Well-known keys.
pub mod keys {
    /// Durable: raw session token.
    pub const TOKEN: &str = "token";
    /// Durable: JSON-serialized user record.
    pub const USER: &str = "user";
    /// Tab-scoped: set to `"true"` after a barber registers.
    pub const NEW_BARBER_REGISTRATION: &str = "new_barber_registration";
}

use std::{fmt, io};

/// Errors surfaced by storage backends.
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(formatter, "Storage I/O error: {err}"),
            StorageError::Serialization(message) => {
                write!(formatter, "Storage encoding error: {message}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Serialization(_) => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

/// Synchronous string key/value store.
pub trait Storage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
