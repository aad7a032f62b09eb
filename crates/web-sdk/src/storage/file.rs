//! File-backed storage backend: one JSON file per key inside a data
//! directory. Used by the host binary in place of browser local storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use timeline_core::{TimelineError, TimelineResult};

use super::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> TimelineResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            TimelineError::StorageUnavailable(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileStorage {
    fn backend(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> TimelineResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> TimelineResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|e| TimelineError::Storage(format!("cannot write {}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = value.len(), "storage entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> TimelineResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
