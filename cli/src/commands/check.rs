use session_gate::{GateConfig, HttpTokenRefresher, SessionGate};
use session_gate_cli::{FileSessionStore, Result, TerminalPage};

/// Run one gate evaluation against the session file.
///
/// Returns `true` when access was granted. A denied run has already wiped
/// the file when this returns.
pub async fn handle_check(config: GateConfig, store: FileSessionStore) -> Result<bool> {
    let refresher = HttpTokenRefresher::from_config(&config)?;
    let mut gate = SessionGate::new(config, store, refresher);
    let mut page = TerminalPage::new();

    let outcome = gate.guard(&mut page).await;
    if let Some(denial) = outcome.denial() {
        log::debug!("[CHECK] Denied: {}", denial.cause);
    }

    Ok(page.granted())
}
