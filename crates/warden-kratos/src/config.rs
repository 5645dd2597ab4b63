//! Kratos endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default public (frontend) API address of a local Kratos.
pub const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:4433";

/// Default admin API address of a local Kratos.
pub const DEFAULT_ADMIN_URL: &str = "http://127.0.0.1:4434";

/// Where Kratos lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KratosConfig {
    /// Base URL of the public API (session introspection).
    pub public_url: String,
    /// Base URL of the admin API (identities and sessions).
    pub admin_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for KratosConfig {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            admin_url: DEFAULT_ADMIN_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl KratosConfig {
    /// Config pointing at the given public and admin base URLs.
    pub fn new(public_url: impl Into<String>, admin_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
            admin_url: admin_url.into(),
            ..Self::default()
        }
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
