//! Warden configuration: TOML file plus command-line/environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warden_auth::AuthConfig;
use warden_kratos::KratosConfig;

use crate::{Error, Result};

/// Default listen address for `warden serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// HTTP front configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Top-level configuration file.
///
/// ```toml
/// [kratos]
/// public_url = "http://127.0.0.1:4433"
/// admin_url = "http://127.0.0.1:4434"
/// timeout_secs = 10
///
/// [auth]
/// enabled = true
///
/// [server]
/// bind = "127.0.0.1:8080"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Kratos endpoints.
    pub kratos: KratosConfig,
    /// Middleware behaviour.
    pub auth: AuthConfig,
    /// HTTP front.
    pub server: ServerConfig,
}

/// Values given on the command line or through the environment.
/// `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Kratos public API base URL.
    pub public_url: Option<String>,
    /// Kratos admin API base URL.
    pub admin_url: Option<String>,
    /// Listen address.
    pub bind: Option<String>,
}

impl WardenConfig {
    /// `<config dir>/warden/config.toml` for this platform.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("warden").join("config.toml"))
    }

    /// The file that [`load`](Self::load) would read.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(Self::default_path)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is read if
    /// present and built-in defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Apply command-line/environment overrides.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.public_url {
            self.kratos.public_url = url.clone();
        }
        if let Some(url) = &overrides.admin_url {
            self.kratos.admin_url = url.clone();
        }
        if let Some(bind) = &overrides.bind {
            self.server.bind = bind.clone();
        }
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_file_partial() {
        let file = write_config(
            r#"
            [kratos]
            admin_url = "http://kratos-admin:4434"

            [auth]
            enabled = false
            "#,
        );
        let config = WardenConfig::from_file(file.path()).unwrap();
        assert_eq!(config.kratos.admin_url, "http://kratos-admin:4434");
        assert_eq!(config.kratos.public_url, "http://127.0.0.1:4433");
        assert!(!config.auth.enabled);
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let file = write_config("");
        let config = WardenConfig::from_file(file.path()).unwrap();
        assert!(config.auth.enabled);
        assert_eq!(config.kratos.timeout_secs, 10);
    }

    #[test]
    fn test_malformed_file() {
        let file = write_config("[kratos\nadmin_url = ");
        let err = WardenConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            WardenConfig::load(Some(&missing)),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = WardenConfig::default();
        config.apply(&Overrides {
            public_url: Some("https://auth.example.com".to_string()),
            admin_url: None,
            bind: Some("0.0.0.0:9000".to_string()),
        });
        assert_eq!(config.kratos.public_url, "https://auth.example.com");
        assert_eq!(config.kratos.admin_url, "http://127.0.0.1:4434");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = WardenConfig::default();
        config.kratos.timeout_secs = 3;
        let text = config.to_toml_string().unwrap();
        let parsed: WardenConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.kratos, config.kratos);
        assert_eq!(parsed.server, config.server);
    }
}
