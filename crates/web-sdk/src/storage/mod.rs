//! Key-value storage backends for the persisted session record.
//!
//! Each backend implements [`KeyValueStore`]. The session store only ever
//! reads, overwrites or removes whole values under a single key.

pub mod file;
pub mod memory;

use std::sync::Arc;

use timeline_core::{TimelineError, TimelineResult};

pub trait KeyValueStore: Send + Sync {
    /// Backend identifier (e.g. "memory", "file").
    fn backend(&self) -> &str;

    fn get(&self, key: &str) -> TimelineResult<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> TimelineResult<()>;

    fn remove(&self, key: &str) -> TimelineResult<()>;
}

/// Backend for environments where local storage is disabled. Every call fails
/// with [`TimelineError::StorageUnavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl KeyValueStore for UnavailableStorage {
    fn backend(&self) -> &str {
        "unavailable"
    }

    fn get(&self, _key: &str) -> TimelineResult<Option<String>> {
        Err(TimelineError::StorageUnavailable("storage is disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> TimelineResult<()> {
        Err(TimelineError::StorageUnavailable("storage is disabled".into()))
    }

    fn remove(&self, _key: &str) -> TimelineResult<()> {
        Err(TimelineError::StorageUnavailable("storage is disabled".into()))
    }
}

pub fn unavailable_storage() -> Arc<dyn KeyValueStore> {
    Arc::new(UnavailableStorage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_storage_always_fails() {
        let storage = unavailable_storage();
        assert_eq!(storage.backend(), "unavailable");
        assert!(storage.get("k").is_err());
        assert!(storage.set("k", "v").is_err());
        assert!(storage.remove("k").is_err());
    }
}
