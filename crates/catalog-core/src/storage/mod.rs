//! Durable key-value storage for the persisted token record.
//!
//! This module provides:
//! - `FileStorage`: JSON key-value file in the data directory
//! - `KeyringStorage`: OS keychain entries via `keyring`
//! - `MemoryStorage`: process-local map for tests and throwaway sessions
//!
//! Only the session store writes the token record.

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use file::FileStorage;
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

/// Well-known key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "auth_token";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-to-string store that outlives the process.
pub trait TokenStorage {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: TokenStorage + ?Sized> TokenStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
