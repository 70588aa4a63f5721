//! services/auth_client/src/adapters/file_store.rs
//!
//! File-backed implementation of the `SessionPersistence` port. Each storage key
//! maps to one JSON file under the session directory.

use auth_session_core::domain::Session;
use auth_session_core::ports::{PortError, PortResult, SessionPersistence};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::adapters::record::{decode_snapshot, encode_snapshot};

/// Namespace key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "auth-storage";

#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Creates a storage for `key` under `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SessionPersistence for FileSessionStorage {
    fn load(&self) -> PortResult<Option<Session>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PortError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        decode_snapshot(&json).map(Some)
    }

    fn save(&self, session: &Session) -> PortResult<()> {
        let json = encode_snapshot(session)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                PortError::Storage(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        // Readers never see a partially written snapshot.
        let tmp = self.tmp_path();
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(PortError::Storage(format!("Failed to write {}: {}", tmp.display(), e)));
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(PortError::Storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!(path = %self.path.display(), "Session snapshot written");
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
