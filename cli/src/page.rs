//! Terminal rendering of gate outcomes
//!
//! Stands in for a browser page: "initialize" prints the session summary,
//! the access-denied dialog goes to stderr, and the redirect prints where a
//! browser would have been sent.

use colored::Colorize;
use session_gate::{AuthenticatedSession, ProtectedPage};

/// Page that writes to the terminal and remembers whether it was let in.
#[derive(Debug, Default)]
pub struct TerminalPage {
    granted: bool,
    redirected_to: Option<String>,
}

impl TerminalPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted(&self) -> bool {
        self.granted
    }

    pub fn redirected_to(&self) -> Option<&str> {
        self.redirected_to.as_deref()
    }
}

impl ProtectedPage for TerminalPage {
    fn initialize(&mut self, session: &AuthenticatedSession) {
        self.granted = true;

        println!("{}", "Access granted".green().bold());
        println!("Email: {}", session.email);
        println!("Role: {}", session.role.as_deref().unwrap_or("(none)"));
        println!("Expires: {}", format_expiry(session.expires_at));
        if session.refreshed {
            println!("Token: {}", "refreshed".yellow());
        }
        if session.is_privileged() {
            println!("Admin controls: {}", "available".cyan());
        }
    }

    fn show_access_denied(&mut self, title: &str, message: &str) {
        eprintln!("{}", title.red().bold());
        eprintln!("{}", message);
    }

    fn redirect(&mut self, url: &str) {
        self.redirected_to = Some(url.to_string());
        eprintln!("Redirecting to {}", url);
    }
}

/// Render epoch seconds as RFC 3339, or the raw number if out of range.
pub fn format_expiry(expires_at: i64) -> String {
    chrono::DateTime::from_timestamp(expires_at, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| expires_at.to_string())
}
