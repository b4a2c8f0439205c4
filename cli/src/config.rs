//! Configuration file management
//!
//! Loads `~/.session-gate/config.toml`. A missing file means defaults.
//!
//! # Configuration Format
//!
//! ```toml
//! [backend]
//! url = "http://localhost:8080"        # REST backend base URL
//! refresh_path = "/auth/refreshToken"  # Refresh endpoint path
//! timeout = 30                         # Refresh timeout in seconds (omit for none)
//!
//! [gate]
//! login_url = "/login.html"            # Where denied visitors are sent
//! privileged_role = "ADMIN"            # Role that unlocks admin-only controls
//!
//! [session]
//! file = "~/.config/session-gate/session.json"
//! ```

use serde::{Deserialize, Serialize};
use session_gate::config::{DEFAULT_LOGIN_URL, DEFAULT_PRIVILEGED_ROLE, DEFAULT_REFRESH_PATH};
use session_gate::GateConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CLIError, Result};

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CLIConfiguration {
    /// Backend connection settings
    pub backend: Option<BackendConfig>,

    /// Gate behavior
    pub gate: Option<GateSettings>,

    /// Session storage
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend base URL (e.g., http://localhost:8080)
    pub url: Option<String>,

    /// Refresh endpoint path (default: /auth/refreshToken)
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Refresh request timeout in seconds
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    /// Login page URL (default: /login.html)
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Privileged role name (default: ADMIN)
    #[serde(default = "default_privileged_role")]
    pub privileged_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file path
    pub file: Option<PathBuf>,
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

fn default_privileged_role() -> String {
    DEFAULT_PRIVILEGED_ROLE.to_string()
}

const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or("~/.session-gate/config.toml");
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

impl CLIConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            log::debug!("[CONFIG] No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CLIError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: CLIConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Session file from config, if set
    pub fn session_file(&self) -> Option<PathBuf> {
        self.session
            .as_ref()
            .and_then(|s| s.file.as_deref())
            .map(expand_config_path)
    }

    /// Build the gate configuration, letting `url_override` win over the file.
    pub fn to_gate_config(&self, url_override: Option<&str>) -> Result<GateConfig> {
        let backend = self.backend.as_ref();
        let url = url_override
            .map(str::to_string)
            .or_else(|| backend.and_then(|b| b.url.clone()))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let mut builder = GateConfig::builder().base_url(url);

        if let Some(backend) = backend {
            builder = builder.refresh_path(backend.refresh_path.clone());
            if let Some(secs) = backend.timeout {
                builder = builder.request_timeout(Duration::from_secs(secs));
            }
        }

        if let Some(gate) = &self.gate {
            builder = builder
                .login_url(gate.login_url.clone())
                .privileged_role(gate.privileged_role.clone());
        }

        Ok(builder.build()?)
    }
}
