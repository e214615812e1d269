//! Server configuration.

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the persisted pricing configuration
    #[serde(default = "default_config_path")]
    pub config_path: String,

    /// Shared admin secret; when unset the `ADMIN_TOKEN` environment
    /// variable is consulted, and with neither set the admin surface is
    /// open (dev mode).
    pub admin_token: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_config_path() -> String {
    "./data/panelquote.ini".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            config_path: default_config_path(),
            admin_token: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Effective admin token: configured value first, environment second.
    #[must_use]
    pub fn effective_admin_token(&self) -> Option<String> {
        self.admin_token
            .clone()
            .or_else(|| std::env::var("ADMIN_TOKEN").ok())
            .filter(|token| !token.is_empty())
    }
}
