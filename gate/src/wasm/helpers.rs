use crate::error::GateError;
use wasm_bindgen::prelude::*;
use web_sys::{Request, Window};

// `web_sys::window()` is `None` under Node.js test runners, so fetch goes
// through the global binding, which exists in both browsers and Node 18+.

#[wasm_bindgen]
extern "C" {
    /// Call the global `fetch(request)`.
    #[wasm_bindgen(js_name = "fetch")]
    fn global_fetch_with_request(request: &Request) -> js_sys::Promise;
}

/// Portable replacement for `window.fetch_with_request(req)`.
pub(crate) fn fetch_request(request: &Request) -> js_sys::Promise {
    global_fetch_with_request(request)
}

/// The page's `window`, or a storage error when there is none.
pub(crate) fn window() -> Result<Window, GateError> {
    web_sys::window().ok_or_else(|| GateError::StorageError("No global `window`".into()))
}

/// Render a thrown JS value for an error message.
pub(crate) fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
