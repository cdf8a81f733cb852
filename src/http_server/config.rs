//! Listener settings for the hierarchy API
//!
//! Read from the `http` section of `namhatta.json`. Every field may be
//! omitted: the service then listens on `127.0.0.1:5000` and accepts
//! browser calls from the admin frontend's dev server.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const ADMIN_FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// `http` section of the service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API; empty allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors_origins() -> Vec<String> {
    vec![ADMIN_FRONTEND_ORIGIN.to_string()]
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl HttpServerConfig {
    /// Defaults with another port, as `serve --port` does.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the listener or CORS layer cannot use.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("http.host must not be empty".to_string());
        }
        for origin in &self.cors_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(format!("http.cors_origins: invalid origin {:?}", origin));
            }
        }
        Ok(())
    }

    /// Configured origins as header values. Unusable entries are skipped;
    /// `validate` reports them at boot.
    pub fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.cors_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect()
    }
}
