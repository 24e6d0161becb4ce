//! Key-value storage backends.
//!
//! The store persists everything through the [`KeyValueBackend`] contract:
//! an opaque string store with get/set/remove. Two file-backed
//! implementations exist, an encrypted primary and a plaintext fallback,
//! mirroring a platform secure store and its general-purpose sibling.

use crate::crypto::StoreCrypto;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors surfaced by a backend call. The store reacts to the failure, not
/// the kind, so these exist mainly for diagnostics.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Stored value unreadable: {0}")]
    Unreadable(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key-value store with explicit results.
pub trait KeyValueBackend: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Fetch a value. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value, overwriting any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys become file names, so restrict them to a safe alphabet.
fn key_path(root: &Path, key: &str) -> Result<PathBuf, StorageError> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(root.join(key))
}

fn write_value(path: &Path, value: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StorageError::Unavailable(format!("{}: {e}", path.display())))?;
    }
    fs::write(path, value)
        .map_err(|e| StorageError::Unavailable(format!("{}: {e}", path.display())))?;

    // Owner-only permissions on the value files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        let _ = fs::set_permissions(path, perms);
    }

    Ok(())
}

fn read_value(path: &Path) -> Result<Option<String>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| StorageError::Unavailable(format!("{}: {e}", path.display())))
}

fn remove_value(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::Unavailable(format!(
            "{}: {e}",
            path.display()
        ))),
    }
}

/// Primary backend: values sealed with AES-256-GCM under a master password.
pub struct EncryptedFileBackend {
    root: PathBuf,
    crypto: StoreCrypto,
    master_password: Zeroizing<String>,
}

impl EncryptedFileBackend {
    pub fn new(root: PathBuf, master_password: String) -> Self {
        Self {
            root,
            crypto: StoreCrypto::new(),
            master_password: Zeroizing::new(master_password),
        }
    }
}

impl KeyValueBackend for EncryptedFileBackend {
    fn name(&self) -> &'static str {
        "encrypted"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = key_path(&self.root, key)?;
        match read_value(&path)? {
            None => Ok(None),
            Some(envelope) => self
                .crypto
                .open(envelope.trim(), &self.master_password)
                .map(Some)
                .map_err(|e| StorageError::Unreadable(format!("{key}: {e}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = key_path(&self.root, key)?;
        let envelope = self
            .crypto
            .seal(value, &self.master_password)
            .map_err(|e| StorageError::Unavailable(format!("{key}: {e}")))?;
        write_value(&path, &envelope)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = key_path(&self.root, key)?;
        remove_value(&path)
    }
}

/// Fallback backend: plaintext values, no encryption guarantee.
pub struct PlainFileBackend {
    root: PathBuf,
}

impl PlainFileBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl KeyValueBackend for PlainFileBackend {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = key_path(&self.root, key)?;
        read_value(&path)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = key_path(&self.root, key)?;
        write_value(&path, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = key_path(&self.root, key)?;
        remove_value(&path)
    }
}
