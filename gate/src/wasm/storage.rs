use super::helpers::{js_message, window};
use crate::error::{GateError, Result};
use crate::session::{SessionRecord, SessionStore, SESSION_STORAGE_KEY};
use web_sys::Storage;

/// `window.sessionStorage`, one JSON record under a single key.
///
/// Scoped to the tab: each tab keeps its own record and the last writer wins.
#[derive(Debug, Clone)]
pub struct BrowserSessionStore {
    key: String,
}

impl BrowserSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn storage(&self) -> Result<Storage> {
        window()?
            .session_storage()
            .map_err(|e| GateError::StorageError(js_message(&e)))?
            .ok_or_else(|| GateError::StorageError("sessionStorage is unavailable".into()))
    }
}

impl Default for BrowserSessionStore {
    fn default() -> Self {
        Self::new(SESSION_STORAGE_KEY)
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self) -> Result<Option<SessionRecord>> {
        let raw = self
            .storage()?
            .get_item(&self.key)
            .map_err(|e| GateError::StorageError(js_message(&e)))?;

        match raw {
            Some(raw) => SessionRecord::from_json(&raw).map(Some),
            None => Ok(None),
        }
    }

    fn set(&mut self, record: &SessionRecord) -> Result<()> {
        let raw = record.to_json()?;
        self.storage()?
            .set_item(&self.key, &raw)
            .map_err(|e| GateError::StorageError(js_message(&e)))
    }

    fn clear(&mut self) -> Result<()> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|e| GateError::StorageError(js_message(&e)))
    }
}
