use super::helpers::{fetch_request, js_message};
use crate::error::{GateError, Result};
use crate::refresh::{RefreshRequest, RefreshResponse, TokenRefresher};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// Refresher that posts through the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct FetchTokenRefresher {
    refresh_url: String,
}

impl FetchTokenRefresher {
    pub fn new(refresh_url: impl Into<String>) -> Self {
        Self {
            refresh_url: refresh_url.into(),
        }
    }
}

fn network(err: wasm_bindgen::JsValue) -> GateError {
    GateError::NetworkError(js_message(&err))
}

#[async_trait::async_trait(?Send)]
impl TokenRefresher for FetchTokenRefresher {
    async fn refresh(&self, current_token: &str) -> Result<String> {
        let body = serde_json::to_string(&RefreshRequest {
            refresh_token: current_token.to_string(),
        })
        .map_err(|e| GateError::NetworkError(e.to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new().map_err(network)?;
        headers.set("Content-Type", "application/json").map_err(network)?;
        opts.set_headers(&headers);
        opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&self.refresh_url, &opts).map_err(network)?;

        let resp_value = JsFuture::from(fetch_request(&request)).await.map_err(network)?;
        let resp: Response = resp_value.dyn_into().map_err(network)?;

        let text = JsFuture::from(resp.text().map_err(network)?)
            .await
            .map_err(network)?
            .as_string()
            .unwrap_or_default();

        if !resp.ok() {
            return Err(GateError::RefreshRejected {
                status: resp.status(),
                message: if text.is_empty() {
                    format!("Token refresh failed: HTTP {}", resp.status())
                } else {
                    text
                },
            });
        }

        RefreshResponse::token_from_body(&text)
    }
}
