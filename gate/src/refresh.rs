//! Token refresh against the backend.
//!
//! The gate calls [`TokenRefresher::refresh`] at most once per evaluation.
//! Implementations must not retry on their own and must not fall back to the
//! stale token: any failure is returned to the gate, which denies access.

use crate::error::{GateError, Result};
use serde::{Deserialize, Serialize};

/// Body sent to the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Success body returned by the refresh endpoint: `{ "data": { "token": ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RefreshResponse {
    #[serde(default)]
    pub data: Option<RefreshData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RefreshData {
    #[serde(default)]
    pub token: Option<String>,
}

impl RefreshResponse {
    /// Parse a raw response body and pull out the new token.
    ///
    /// A body that is not JSON, lacks `data.token`, or carries an empty token
    /// is a refresh failure.
    pub fn token_from_body(body: &str) -> Result<String> {
        let parsed: RefreshResponse = serde_json::from_str(body)
            .map_err(|e| GateError::malformed_refresh(format!("Failed to parse refresh response: {}", e)))?;
        parsed.into_token()
    }

    /// Extract the new token.
    pub fn into_token(self) -> Result<String> {
        self.data
            .and_then(|d| d.token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GateError::malformed_refresh("Refresh response is missing data.token"))
    }
}

/// Exchanges the current token for a new one.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait TokenRefresher {
    /// Return a fresh token for `current_token`.
    async fn refresh(&self, current_token: &str) -> Result<String>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use self::http::{HttpTokenRefresher, HttpTokenRefresherBuilder};

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use super::{RefreshRequest, RefreshResponse, TokenRefresher};
    use crate::config::GateConfig;
    use crate::error::{GateError, Result};
    use std::time::Duration;

    /// Refresher backed by `reqwest`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use session_gate::{HttpTokenRefresher, TokenRefresher};
    ///
    /// # async fn example() -> session_gate::Result<()> {
    /// let refresher = HttpTokenRefresher::builder()
    ///     .refresh_url("http://localhost:8080/auth/refreshToken")
    ///     .build()?;
    ///
    /// let fresh = refresher.refresh("eyJhbGc...").await?;
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Debug, Clone)]
    pub struct HttpTokenRefresher {
        refresh_url: String,
        http_client: reqwest::Client,
    }

    impl HttpTokenRefresher {
        /// Create a new builder.
        pub fn builder() -> HttpTokenRefresherBuilder {
            HttpTokenRefresherBuilder::default()
        }

        /// Build a refresher from a gate configuration.
        pub fn from_config(config: &GateConfig) -> Result<Self> {
            let mut builder = Self::builder().refresh_url(config.refresh_url());
            if let Some(timeout) = config.request_timeout {
                builder = builder.timeout(timeout);
            }
            builder.build()
        }

        /// Endpoint this refresher posts to.
        pub fn refresh_url(&self) -> &str {
            &self.refresh_url
        }
    }

    #[async_trait::async_trait]
    impl TokenRefresher for HttpTokenRefresher {
        async fn refresh(&self, current_token: &str) -> Result<String> {
            log::debug!("[REFRESH] POST {}", self.refresh_url);
            let start = std::time::Instant::now();

            let request = RefreshRequest {
                refresh_token: current_token.to_string(),
            };
            let response = self.http_client.post(&self.refresh_url).json(&request).send().await?;

            let status = response.status();
            log::debug!(
                "[REFRESH] HTTP response received in {:?}, status={}",
                start.elapsed(),
                status
            );

            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                log::debug!("[REFRESH] Refresh rejected: {}", error_text);
                return Err(GateError::RefreshRejected {
                    status: status.as_u16(),
                    message: if error_text.is_empty() {
                        format!("Token refresh failed: HTTP {}", status)
                    } else {
                        error_text
                    },
                });
            }

            let body = response.text().await?;
            let token = RefreshResponse::token_from_body(&body)?;
            log::debug!("[REFRESH] New token issued in {:?}", start.elapsed());
            Ok(token)
        }
    }

    /// Builder for [`HttpTokenRefresher`].
    #[derive(Debug, Default)]
    pub struct HttpTokenRefresherBuilder {
        refresh_url: Option<String>,
        timeout: Option<Duration>,
        http_client: Option<reqwest::Client>,
    }

    impl HttpTokenRefresherBuilder {
        /// Set the full refresh endpoint URL (required).
        pub fn refresh_url(mut self, url: impl Into<String>) -> Self {
            self.refresh_url = Some(url.into());
            self
        }

        /// Bound the refresh request.
        pub fn timeout(mut self, timeout: Duration) -> Self {
            self.timeout = Some(timeout);
            self
        }

        /// Reuse an existing HTTP client. Ignores `timeout`.
        pub fn http_client(mut self, client: reqwest::Client) -> Self {
            self.http_client = Some(client);
            self
        }

        /// Build the refresher.
        pub fn build(self) -> Result<HttpTokenRefresher> {
            let refresh_url = self
                .refresh_url
                .ok_or_else(|| GateError::ConfigurationError("refresh_url is required".into()))?;

            let http_client = match self.http_client {
                Some(client) => client,
                None => {
                    let mut builder = reqwest::Client::builder();
                    if let Some(timeout) = self.timeout {
                        builder = builder.timeout(timeout);
                    }
                    builder
                        .build()
                        .map_err(|e| GateError::ConfigurationError(e.to_string()))?
                },
            };

            Ok(HttpTokenRefresher {
                refresh_url,
                http_client,
            })
        }
    }
}
