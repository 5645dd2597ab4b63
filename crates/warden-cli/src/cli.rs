//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// Warden - Kratos session validation and identity admin
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WARDEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Kratos public API base URL
    #[arg(long, env = "WARDEN_KRATOS_PUBLIC_URL", global = true)]
    pub public_url: Option<String>,

    /// Kratos admin API base URL
    #[arg(long, env = "WARDEN_KRATOS_ADMIN_URL", global = true)]
    pub admin_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Config overrides carried by global flags and the subcommand.
    pub fn overrides(&self) -> Overrides {
        let bind = match &self.command {
            Command::Serve { bind } => bind.clone(),
            _ => None,
        };
        Overrides {
            public_url: self.public_url.clone(),
            admin_url: self.admin_url.clone(),
            bind,
        }
    }
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a session token and print the resulting user
    Whoami {
        /// Session token to introspect
        #[arg(long, env = "WARDEN_SESSION_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Identity administration
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },
    /// Session administration
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Run an HTTP front that authenticates every request against Kratos
    Serve {
        /// Listen address
        #[arg(long, env = "WARDEN_BIND")]
        bind: Option<String>,
    },
    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `warden identity ...`
#[derive(Subcommand, Debug)]
pub enum IdentityAction {
    /// Show an identity as a normalized user
    Get {
        /// Identity ID
        id: String,
    },
    /// Replace an identity's traits
    Update {
        /// Identity ID
        id: String,
        /// New traits as a JSON object; replaces the existing traits entirely
        #[arg(long)]
        traits: String,
    },
    /// Delete an identity
    Delete {
        /// Identity ID
        id: String,
    },
}

/// `warden sessions ...`
#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// List an identity's sessions
    List {
        /// Identity ID
        identity_id: String,
    },
    /// Revoke a session
    Revoke {
        /// Session ID
        session_id: String,
    },
}

/// `warden config ...`
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}
