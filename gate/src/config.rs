//! Gate configuration.
//!
//! Endpoint paths, the login page location, and the privileged role name.

use crate::claims::{RoleClaim, DEFAULT_ROLE_CLAIMS};
use crate::error::{GateError, Result};
use crate::session::SESSION_STORAGE_KEY;
use std::time::Duration;

/// Default refresh endpoint, relative to the backend base URL.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refreshToken";

/// Default login page.
pub const DEFAULT_LOGIN_URL: &str = "/login.html";

/// Role value that unlocks privileged UI (admin console, moderation tools).
pub const DEFAULT_PRIVILEGED_ROLE: &str = "ADMIN";

/// Configuration shared by the gate and its adapters.
///
/// # Examples
///
/// ```rust
/// use session_gate::GateConfig;
///
/// let config = GateConfig::builder()
///     .base_url("https://api.example.com/")
///     .login_url("/index.html")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.refresh_url(), "https://api.example.com/auth/refreshToken");
/// ```
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Backend base URL, without trailing slash.
    pub base_url: String,

    /// Refresh endpoint path, appended to `base_url`.
    /// Default: `/auth/refreshToken`
    pub refresh_path: String,

    /// Where denied visitors are sent.
    /// Default: `/login.html`
    pub login_url: String,

    /// Role that unlocks privileged controls.
    /// Default: `ADMIN`
    pub privileged_role: String,

    /// Storage key for the session record.
    /// Default: `user`
    pub storage_key: String,

    /// Role extraction strategies, tried in order.
    pub role_claims: Vec<RoleClaim>,

    /// Optional HTTP timeout for the refresh call. `None` leaves it to the
    /// transport's own limits.
    pub request_timeout: Option<Duration>,
}

impl GateConfig {
    /// Create a new builder.
    pub fn builder() -> GateConfigBuilder {
        GateConfigBuilder::new()
    }

    /// Full refresh endpoint URL.
    pub fn refresh_url(&self) -> String {
        format!("{}{}", self.base_url, self.refresh_path)
    }
}

/// Builder for [`GateConfig`].
#[derive(Debug, Clone)]
pub struct GateConfigBuilder {
    base_url: Option<String>,
    refresh_path: String,
    login_url: String,
    privileged_role: String,
    storage_key: String,
    role_claims: Vec<RoleClaim>,
    request_timeout: Option<Duration>,
}

impl GateConfigBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            privileged_role: DEFAULT_PRIVILEGED_ROLE.to_string(),
            storage_key: SESSION_STORAGE_KEY.to_string(),
            role_claims: DEFAULT_ROLE_CLAIMS.to_vec(),
            request_timeout: None,
        }
    }

    /// Set the backend base URL (required).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the refresh endpoint path.
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set the login page URL.
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    /// Set the privileged role name.
    pub fn privileged_role(mut self, role: impl Into<String>) -> Self {
        self.privileged_role = role.into();
        self
    }

    /// Set the storage key.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Replace the role extraction strategies.
    pub fn role_claims(mut self, claims: Vec<RoleClaim>) -> Self {
        self.role_claims = claims;
        self
    }

    /// Bound the refresh request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<GateConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| GateError::ConfigurationError("base_url is required".into()))?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GateError::ConfigurationError(format!(
                "base_url must start with http:// or https:// (got '{}')",
                base_url
            )));
        }

        let refresh_path = if self.refresh_path.starts_with('/') {
            self.refresh_path
        } else {
            format!("/{}", self.refresh_path)
        };

        if self.login_url.trim().is_empty() {
            return Err(GateError::ConfigurationError("login_url cannot be empty".into()));
        }

        Ok(GateConfig {
            base_url,
            refresh_path,
            login_url: self.login_url,
            privileged_role: self.privileged_role,
            storage_key: self.storage_key,
            role_claims: self.role_claims,
            request_timeout: self.request_timeout,
        })
    }
}
