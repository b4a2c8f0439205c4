// Browser bindings for the session gate.
// Protected pages call `guardPage` from their bootstrap script instead of
// carrying their own copy of the token check.

#![cfg(all(feature = "wasm", target_arch = "wasm32"))]

mod helpers;
mod page;
mod refresher;
mod storage;

pub use page::BrowserPage;
pub use refresher::FetchTokenRefresher;
pub use storage::BrowserSessionStore;

use crate::config::GateConfig;
use crate::gate::SessionGate;
use crate::session::SessionStore;
use wasm_bindgen::prelude::*;

/// Run the gate for the current page.
///
/// Resolves to `true` once `onReady(session)` has been called, `false` after
/// the "Access Denied!" alert and the redirect to `loginUrl`.
///
/// # Example (JavaScript)
/// ```js
/// import init, { guardPage, logout } from './pkg/session_gate.js';
///
/// await init();
/// await guardPage("https://api.example.com", "/login.html", (session) => {
///   document.querySelectorAll('.admin-only')
///     .forEach((el) => el.hidden = !session.privileged);
///   document.getElementById('logout')
///     .addEventListener('click', () => logout("/login.html"));
/// });
/// ```
#[wasm_bindgen(js_name = guardPage)]
pub async fn guard_page(
    base_url: String,
    login_url: String,
    on_ready: js_sys::Function,
) -> Result<bool, JsValue> {
    let config = GateConfig::builder()
        .base_url(base_url)
        .login_url(login_url)
        .build()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let store = BrowserSessionStore::new(config.storage_key.clone());
    let refresher = FetchTokenRefresher::new(config.refresh_url());
    let mut page = BrowserPage::new(on_ready);

    let mut gate = SessionGate::new(config, store, refresher);
    let outcome = gate.guard(&mut page).await;

    if let Some(denial) = outcome.denial() {
        console_log(&format!("SessionGate: access denied ({})", denial.cause));
    } else {
        console_log("SessionGate: session accepted");
    }

    Ok(outcome.is_authenticated())
}

/// Clear the stored session and navigate to `loginUrl`.
#[wasm_bindgen]
pub fn logout(login_url: String) -> Result<(), JsValue> {
    let mut store = BrowserSessionStore::default();
    let cleared = store.clear();

    let mut page = BrowserPage::without_callback();
    crate::gate::ProtectedPage::redirect(&mut page, &login_url);

    cleared.map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

fn console_log(s: &str) {
    log(s);
}
