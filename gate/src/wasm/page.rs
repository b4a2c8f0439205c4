use super::helpers::{js_message, window};
use crate::gate::{AuthenticatedSession, ProtectedPage};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// What the page's `onReady` callback receives.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView<'a> {
    email: &'a str,
    role: Option<&'a str>,
    privileged: bool,
    expires_at: i64,
    refreshed: bool,
}

/// Body of the blocking denial dialog.
pub(crate) fn alert_text(title: &str, message: &str) -> String {
    format!("{}\n\n{}", title, message)
}

/// The current document: `window.alert` for the denial dialog,
/// `location.href` for navigation, and a JS callback as UI initializer.
pub struct BrowserPage {
    on_ready: Option<js_sys::Function>,
}

impl BrowserPage {
    pub fn new(on_ready: js_sys::Function) -> Self {
        Self {
            on_ready: Some(on_ready),
        }
    }

    pub fn without_callback() -> Self {
        Self { on_ready: None }
    }
}

impl ProtectedPage for BrowserPage {
    fn initialize(&mut self, session: &AuthenticatedSession) {
        let Some(on_ready) = &self.on_ready else {
            return;
        };

        let view = SessionView {
            email: &session.email,
            role: session.role.as_deref(),
            privileged: session.is_privileged(),
            expires_at: session.expires_at,
            refreshed: session.refreshed,
        };

        let arg = match serde_wasm_bindgen::to_value(&view) {
            Ok(arg) => arg,
            Err(e) => {
                log::warn!("[PAGE] Failed to serialize session: {}", e);
                return;
            },
        };

        if let Err(e) = on_ready.call1(&JsValue::NULL, &arg) {
            log::warn!("[PAGE] onReady threw: {}", js_message(&e));
        }
    }

    fn show_access_denied(&mut self, title: &str, message: &str) {
        match window() {
            Ok(window) => {
                if let Err(e) = window.alert_with_message(&alert_text(title, message)) {
                    log::warn!("[PAGE] Alert failed: {}", js_message(&e));
                }
            },
            Err(e) => log::warn!("[PAGE] Alert failed: {}", e),
        }
    }

    fn redirect(&mut self, url: &str) {
        match window() {
            Ok(window) => {
                if let Err(e) = window.location().set_href(url) {
                    log::warn!("[PAGE] Redirect to {} failed: {}", url, js_message(&e));
                }
            },
            Err(e) => log::warn!("[PAGE] Redirect to {} failed: {}", url, e),
        }
    }
}
