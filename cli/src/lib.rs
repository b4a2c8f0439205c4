//! Library entry point for session-gate-cli components.
//!
//! Exposes the config loader, file-backed session store, and terminal page
//! so integration tests can use them without going through the binary.

pub mod config;
pub mod error;
pub mod page;
pub mod store;

pub use config::CLIConfiguration;
pub use error::{CLIError, Result};
pub use page::TerminalPage;
pub use store::FileSessionStore;
