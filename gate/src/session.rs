//! Session record and the storage abstraction that owns it.
//!
//! A page never touches storage directly. It goes through a [`SessionStore`],
//! which has one implementation per environment: in-memory for tests, the
//! browser's `sessionStorage` under the `wasm` feature, and a JSON file in the
//! terminal front end.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Storage key the front end has always used for the session record.
pub const SESSION_STORAGE_KEY: &str = "user";

/// The persisted login: who is signed in and with which bearer token.
///
/// Serialized as `{ "email": ..., "token": ..., "isLoggedIn": ... }`. Missing
/// `email`/`token` fields deserialize to empty strings so a half-written
/// record is treated as "no session" instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    /// Identifier of the authenticated user.
    #[serde(default)]
    pub email: String,

    /// Bearer token (a JWT with an `exp` claim).
    #[serde(default)]
    pub token: String,

    /// Legacy flag some pages set after login.
    #[serde(rename = "isLoggedIn", default, skip_serializing_if = "Option::is_none")]
    pub is_logged_in: Option<bool>,
}

impl SessionRecord {
    /// Create a record for a fresh login.
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
            is_logged_in: None,
        }
    }

    /// Set the legacy `isLoggedIn` flag.
    pub fn with_logged_in(mut self, logged_in: bool) -> Self {
        self.is_logged_in = Some(logged_in);
        self
    }

    /// `true` when the record carries a usable token.
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Copy of this record with the token swapped, every other field preserved.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..self.clone()
        }
    }

    /// Parse a record from its JSON storage form.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize to the JSON storage form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Storage backend for the session record.
///
/// Writes replace the whole record; there is no partial field update, so a
/// reader never observes a half-written session.
///
/// # Security Note
///
/// Tokens are bearer credentials. Implementations must not log them and
/// should restrict who can read the underlying storage.
pub trait SessionStore {
    /// Read the current record.
    ///
    /// Returns `Ok(None)` when nothing is stored. Unparseable content is an
    /// error; the gate treats both the same way.
    fn get(&self) -> Result<Option<SessionRecord>>;

    /// Replace the stored record.
    fn set(&mut self, record: &SessionRecord) -> Result<()>;

    /// Remove the stored record. Succeeds even when nothing was stored.
    fn clear(&mut self) -> Result<()>;

    /// Check whether a record with a token is stored.
    fn has_session(&self) -> Result<bool> {
        Ok(self.get()?.map(|r| r.has_token()).unwrap_or(false))
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self) -> Result<Option<SessionRecord>> {
        (**self).get()
    }

    fn set(&mut self, record: &SessionRecord) -> Result<()> {
        (**self).set(record)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

/// In-memory session store for tests and storage-less environments.
///
/// Holds the record in its serialized form, so malformed content can be
/// injected with [`MemorySessionStore::with_raw`] the same way a browser tab
/// can end up with garbage under the storage key.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    raw: Option<String>,
    writes: usize,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `record`.
    pub fn with_record(record: &SessionRecord) -> Self {
        Self {
            raw: record.to_json().ok(),
            writes: 0,
        }
    }

    /// Create a store holding arbitrary raw content.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            writes: 0,
        }
    }

    /// Raw stored content, if any.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<SessionRecord>> {
        match &self.raw {
            Some(raw) => SessionRecord::from_json(raw).map(Some),
            None => Ok(None),
        }
    }

    fn set(&mut self, record: &SessionRecord) -> Result<()> {
        self.raw = Some(record.to_json()?);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.raw = None;
        Ok(())
    }
}
