use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

/// A durable string slot store, one value per key.
///
/// Every write replaces the whole value. There are no transactions; the
/// last write to a key wins.
pub trait KeyValueSlot {
    /// Read the value under `key`. A key that was never written is `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key` in a single write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueSlot + ?Sized> KeyValueSlot for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Slots stored as `<dir>/<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: None,
        }
    }

    /// Reject writes larger than `bytes`, the way a browser storage quota does.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueSlot for FileSlots {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit,
            });
        }

        let write_err = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Temp file then rename, so readers never see a half-written slot.
        let tmp_path = path.with_extension("json.tmp");
        if let Err(source) = replace_file(&tmp_path, &path, value.as_bytes()) {
            if let Err(e) = std::fs::remove_file(&tmp_path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(path = %tmp_path.display(), error = %e, "failed to remove temp file");
            }
            return Err(write_err(source));
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "slot removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                key: key.to_string(),
                source,
            }),
        }
    }
}

fn replace_file(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(tmp_path, bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(tmp_path, path)
}

/// In-process slots. Clones share the same underlying map, so a clone can
/// stand in for "the same storage after a restart".
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as disabled or full storage would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a raw value, bypassing the failure switch.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueSlot for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "writes to {key} are disabled"
            )));
        }
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.lock().remove(key);
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_slot_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path());
        assert!(slots.read("absent").unwrap().is_none());
    }

    #[test]
    fn file_slot_write_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path().join("nested"));
        slots.write("reports", "[1]").unwrap();
        slots.write("reports", "[2]").unwrap();
        assert_eq!(slots.read("reports").unwrap().as_deref(), Some("[2]"));
        assert!(!dir.path().join("nested/reports.json.tmp").exists());
    }

    #[test]
    fn file_slot_quota_leaves_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path()).with_quota(4);
        slots.write("k", "abc").unwrap();
        let err = slots.write("k", "abcdef").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 6, limit: 4, .. }));
        assert_eq!(slots.read("k").unwrap().as_deref(), Some("abc"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the slot's place makes the final rename fail.
        std::fs::create_dir(dir.path().join("k.json")).unwrap();
        let slots = FileSlots::new(dir.path());

        let err = slots.write("k", "v").unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
        assert!(!dir.path().join("k.json.tmp").exists());
    }

    #[test]
    fn file_slot_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path());
        slots.write("k", "v").unwrap();
        slots.remove("k").unwrap();
        slots.remove("k").unwrap();
        assert!(slots.read("k").unwrap().is_none());
    }

    #[test]
    fn keys_with_path_separators_are_rejected() {
        let slots = MemorySlots::new();
        assert!(matches!(
            slots.write("../escape", "x"),
            Err(StorageError::InvalidKey { .. })
        ));
        assert!(matches!(slots.read(""), Err(StorageError::InvalidKey { .. })));
    }

    #[test]
    fn memory_slot_clones_share_state() {
        let slots = MemorySlots::new();
        let other = slots.clone();
        slots.write("k", "v").unwrap();
        assert_eq!(other.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn memory_slot_failure_switch() {
        let slots = MemorySlots::new();
        slots.write("k", "v1").unwrap();
        slots.set_fail_writes(true);
        assert!(matches!(slots.write("k", "v2"), Err(StorageError::Unavailable(_))));
        assert_eq!(slots.read("k").unwrap().as_deref(), Some("v1"));
        slots.set_fail_writes(false);
        slots.write("k", "v2").unwrap();
        assert_eq!(slots.read("k").unwrap().as_deref(), Some("v2"));
    }
}
