use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::slot::KeyValueSlot;

/// Load a JSON value from a slot. A slot that was never written is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(
    slots: &impl KeyValueSlot,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match slots.read(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize a value and overwrite the slot with it.
pub fn save_json<T: Serialize + ?Sized>(
    slots: &impl KeyValueSlot,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_string(value)?;
    slots.write(key, &body)
}
