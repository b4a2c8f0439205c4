//! File-based session storage for sgate
//!
//! Holds the same JSON record the browser keeps in `sessionStorage`, so a
//! record copied out of a tab's devtools can be pasted into the file as-is.
//!
//! # File Location
//!
//! - Windows: `~/.session-gate/session.json`
//! - Linux/macOS: `~/.config/session-gate/session.json`
//!
//! # Security
//!
//! - File permissions set to 0600 (owner read/write only) on Unix
//! - Writes go to a sibling temp file that is renamed over the record, so a
//!   reader sees either the old record or the new one
//!
//! # File Format
//!
//! ```json
//! { "email": "a@x.com", "token": "eyJhbGciOiJIUzI1NiJ9...", "isLoggedIn": true }
//! ```

use session_gate::{GateError, Result, SessionRecord, SessionStore};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based session store
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file_path: PathBuf,
}

impl FileSessionStore {
    /// Default session file path
    /// - Windows: `~/.session-gate/session.json`
    /// - Linux/macOS: `~/.config/session-gate/session.json`
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".session-gate").join("session.json")
            } else {
                PathBuf::from(".session-gate").join("session.json")
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("session-gate").join("session.json")
            } else if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("session-gate").join("session.json")
            } else {
                PathBuf::from(".session-gate").join("session.json")
            }
        }
    }

    /// Create a store at the default location
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Create a store at a custom location
    pub fn with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    /// Get the file path used by this store
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    fn storage_error(&self, action: &str, e: impl std::fmt::Display) -> GateError {
        GateError::StorageError(format!(
            "Failed to {} session file '{}': {}",
            action,
            self.file_path.display(),
            e
        ))
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<SessionRecord>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.file_path).map_err(|e| self.storage_error("read", e))?;
        let record = SessionRecord::from_json(&contents).map_err(|e| self.storage_error("parse", e))?;
        Ok(Some(record))
    }

    fn set(&mut self, record: &SessionRecord) -> Result<()> {
        let contents = serde_json::to_string_pretty(record).map_err(|e| self.storage_error("serialize", e))?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    GateError::StorageError(format!(
                        "Failed to create session directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, contents).map_err(|e| self.storage_error("write", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&temp_path, permissions)
                .map_err(|e| self.storage_error("set permissions on", e))?;
        }

        fs::rename(&temp_path, &self.file_path).map_err(|e| self.storage_error("replace", e))?;
        log::debug!("[STORE] Session written to {}", self.file_path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => {
                log::debug!("[STORE] Session removed from {}", self.file_path.display());
                Ok(())
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_error("remove", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_temp_store() -> (FileSessionStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("session.json");
        (FileSessionStore::with_path(file_path), temp_dir)
    }

    #[test]
    fn test_file_store_basic_operations() {
        let (mut store, _temp_dir) = create_temp_store();

        assert_eq!(store.get().unwrap(), None);
        assert!(!store.has_session().unwrap());

        let record = SessionRecord::new("a@x.com", "eyJhbGciOiJIUzI1NiJ9.test").with_logged_in(true);
        store.set(&record).unwrap();
        assert_eq!(store.get().unwrap(), Some(record));
        assert!(store.has_session().unwrap());

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("session.json");

        {
            let mut store = FileSessionStore::with_path(file_path.clone());
            store.set(&SessionRecord::new("bob@x.com", "prod_token")).unwrap();
        }

        assert!(file_path.exists());
        assert!(!file_path.with_file_name("session.json.tmp").exists());

        let store = FileSessionStore::with_path(file_path);
        let record = store.get().unwrap().unwrap();
        assert_eq!(record.email, "bob@x.com");
        assert_eq!(record.token, "prod_token");
    }

    #[test]
    fn test_file_store_overwrite_replaces_whole_record() {
        let (mut store, _temp_dir) = create_temp_store();

        store.set(&SessionRecord::new("a@x.com", "old").with_logged_in(true)).unwrap();
        store.set(&SessionRecord::new("a@x.com", "new")).unwrap();

        let record = store.get().unwrap().unwrap();
        assert_eq!(record.token, "new");
        assert_eq!(record.is_logged_in, None);
    }

    #[test]
    fn test_file_store_corrupted_file() {
        let (store, _temp_dir) = create_temp_store();
        fs::write(store.path(), "{not json").unwrap();

        let err = store.get().unwrap_err();
        assert!(err.to_string().contains("Failed to parse session file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (mut store, _temp_dir) = create_temp_store();
        store.set(&SessionRecord::new("a@x.com", "tok")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
