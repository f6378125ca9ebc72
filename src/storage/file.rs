//! Durable storage backed by a single JSON object on disk.
//!
//! The file is rewritten as a whole on every mutation (write to a sibling temp
//! file, then rename) and is created with restricted permissions (0600) since
//! it holds the session token. Token values are never logged.

use super::{Storage, StorageError};
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::{debug, warn};

type Items = BTreeMap<String, String>;

/// Storage that persists every key into one JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Opens (lazily) the storage file at `path`. Nothing is touched on disk
    /// until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORAGE_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Items, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(err) => return Err(err.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Items::new());
        }

        serde_json::from_str(&contents).map_err(|err| {
            StorageError::Serialization(format!(
                "Failed to parse storage file {}: {err}",
                self.path.display()
            ))
        })
    }

    // A corrupt file is replaced rather than blocking every later write.
    fn load_for_write(&self) -> Result<Items, StorageError> {
        match self.load() {
            Err(StorageError::Serialization(message)) => {
                warn!("{message}; starting from an empty store");
                Ok(Items::new())
            }
            other => other,
        }
    }

    fn save(&self, items: &Items) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(items).map_err(|err| {
            StorageError::Serialization(format!("Failed to serialize storage: {err}"))
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        write_restricted(&tmp_path, contents.as_bytes())?;
        fs::rename(&tmp_path, &self.path)?;

        debug!("storage written: {}", self.path.display());
        Ok(())
    }
}

/// Storage file name inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

#[cfg(unix)]
fn write_restricted(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn write_restricted(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load_for_write()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.save(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FileGuard {
        path: PathBuf,
    }

    impl Drop for FileGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    fn temp_dir() -> (PathBuf, FileGuard) {
        let dir = std::env::temp_dir().join(format!("barbershop-storage-{}", uuid::Uuid::new_v4()));
        let guard = FileGuard { path: dir.clone() };
        (dir, guard)
    }

    #[test]
    fn missing_file_reads_as_empty() -> Result<(), StorageError> {
        let (dir, _guard) = temp_dir();
        let storage = FileStorage::in_dir(&dir);
        assert_eq!(storage.get_item("token")?, None);
        assert!(!storage.path().exists());
        Ok(())
    }

    #[test]
    fn values_survive_a_new_instance() -> Result<(), StorageError> {
        let (dir, _guard) = temp_dir();
        FileStorage::in_dir(&dir).set_item("token", "abc123")?;
        FileStorage::in_dir(&dir).set_item("user", r#"{"user_type":"client"}"#)?;

        let reopened = FileStorage::in_dir(&dir);
        assert_eq!(reopened.get_item("token")?, Some("abc123".to_string()));
        assert_eq!(
            reopened.get_item("user")?,
            Some(r#"{"user_type":"client"}"#.to_string())
        );

        reopened.remove_item("token")?;
        assert_eq!(FileStorage::in_dir(&dir).get_item("token")?, None);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() -> Result<(), StorageError> {
        use std::os::unix::fs::PermissionsExt;

        let (dir, _guard) = temp_dir();
        let storage = FileStorage::in_dir(&dir);
        storage.set_item("token", "secret")?;

        let mode = fs::metadata(storage.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn corrupt_file_fails_reads_but_not_writes() -> Result<(), StorageError> {
        let (dir, _guard) = temp_dir();
        fs::create_dir_all(&dir)?;
        let storage = FileStorage::in_dir(&dir);
        fs::write(storage.path(), "{not json")?;

        assert!(matches!(
            storage.get_item("token"),
            Err(StorageError::Serialization(_))
        ));

        storage.set_item("token", "fresh")?;
        assert_eq!(storage.get_item("token")?, Some("fresh".to_string()));
        Ok(())
    }
}
