//! Error types for warden-cli

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for warden-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in warden-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from the auth layer or the Kratos client
    #[error("Auth error: {0}")]
    Auth(#[from] warden_auth::AuthError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error with the path involved
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or socket address involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Bad command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error tagged with a path.
    pub fn io_with_path(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::config("missing admin_url");
        assert_eq!(err.to_string(), "Configuration error: missing admin_url");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = Error::io_with_path(
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            "/etc/warden/config.toml",
        );
        assert!(err.to_string().contains("/etc/warden/config.toml"));
    }

    #[test]
    fn test_auth_error_converts() {
        let err: Error = warden_auth::AuthError::MissingCredential.into();
        assert!(matches!(err, Error::Auth(_)));
    }
}
