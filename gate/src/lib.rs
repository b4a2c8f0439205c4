//! # session-gate
//!
//! Session gate for the platform's protected pages (timeline, profile,
//! messaging, marketplace, admin console). Every page runs the same check
//! before it renders:
//!
//! - read the session record from session-scoped storage
//! - decode the JWT payload locally to learn its expiry and role
//! - refresh an expired token once through `POST {base}/auth/refreshToken`
//! - on any failure wipe the record, show "Access Denied!", go to login
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use session_gate::{GateConfig, HttpTokenRefresher, MemorySessionStore, SessionGate, SessionRecord};
//!
//! # async fn example() -> session_gate::Result<()> {
//! let config = GateConfig::builder()
//!     .base_url("https://api.example.com")
//!     .login_url("/login.html")
//!     .build()?;
//!
//! let store = MemorySessionStore::with_record(&SessionRecord::new("a@x.com", "eyJhbGc..."));
//! let refresher = HttpTokenRefresher::from_config(&config)?;
//!
//! let mut gate = SessionGate::new(config, store, refresher);
//! match gate.evaluate().await.session() {
//!     Some(session) if session.is_privileged() => println!("admin console unlocked"),
//!     Some(_) => println!("regular page"),
//!     None => println!("redirecting to login"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Browser usage
//!
//! With the `wasm` feature on a `wasm32` target the crate exports
//! `guardPage(baseUrl, loginUrl, onReady)` and `logout(loginUrl)`, backed by
//! `window.sessionStorage`, `fetch`, `window.alert`, and `location.href`.

pub mod claims;
pub mod config;
pub mod error;
pub mod gate;
pub mod refresh;
pub mod session;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

pub use claims::{resolve_role, RoleClaim, TokenClaims, AUTHORITY_PREFIX, DEFAULT_ROLE_CLAIMS};
pub use config::{GateConfig, GateConfigBuilder};
pub use error::{GateError, Result};
pub use gate::{
    AuthenticatedSession, Denial, DenialReason, GateOutcome, ProtectedPage, SessionGate,
    TokenState, ACCESS_DENIED_TITLE, NOT_LOGGED_IN_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
pub use refresh::{RefreshRequest, RefreshResponse, TokenRefresher};
#[cfg(not(target_arch = "wasm32"))]
pub use refresh::{HttpTokenRefresher, HttpTokenRefresherBuilder};
pub use session::{MemorySessionStore, SessionRecord, SessionStore, SESSION_STORAGE_KEY};

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm::{BrowserPage, BrowserSessionStore, FetchTokenRefresher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
