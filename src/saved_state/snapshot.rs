//! Opaque key/value blob handed to the host for safekeeping.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::saved_state::SavedStateError;

/// Items a caller chose to persist from its state.
///
/// Only what the caller puts in survives a restart; everything else is
/// rebuilt from defaults or refreshed from its source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous item.
    pub fn put<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), SavedStateError> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|source| SavedStateError::Encode {
            key: key.clone(),
            source,
        })?;
        self.0.insert(key, value);
        Ok(())
    }

    /// Builder form of [`Snapshot::put`].
    pub fn with<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, SavedStateError> {
        self.put(key, value)?;
        Ok(self)
    }

    /// Read the item under `key`.
    ///
    /// Returns `None` when the key is absent or holds a value of another
    /// shape (e.g. written by an older version).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.0.get(key)?;
        match T::deserialize(value) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::debug!(key, error = %err, "Saved item has unexpected shape");
                None
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
