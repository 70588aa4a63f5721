//! services/auth_client/src/adapters/memory_store.rs
//!
//! In-process implementation of the `SessionPersistence` port. Snapshots go
//! through the same JSON encoding as the file store.

use auth_session_core::domain::Session;
use auth_session_core::ports::{PortError, PortResult, SessionPersistence};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::adapters::record::{decode_snapshot, encode_snapshot};

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    snapshot: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save` and `clear` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The raw stored JSON, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().ok().and_then(|guard| guard.clone())
    }

    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.snapshot
            .lock()
            .map_err(|_| PortError::Storage("Session storage lock poisoned".to_string()))
    }

    fn check_writable(&self) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::Storage("Session storage is read-only".to_string()));
        }
        Ok(())
    }
}

impl SessionPersistence for MemorySessionStorage {
    fn load(&self) -> PortResult<Option<Session>> {
        match self.lock()?.as_deref() {
            Some(json) => decode_snapshot(json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> PortResult<()> {
        self.check_writable()?;
        let json = encode_snapshot(session)?;
        *self.lock()? = Some(json);
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        self.check_writable()?;
        *self.lock()? = None;
        Ok(())
    }
}
