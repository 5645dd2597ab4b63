//! # warden-cli
//!
//! Command-line tool for Warden:
//! - Session introspection (`whoami`)
//! - Identity get/update/delete and session list/revoke against the Kratos admin API
//! - `serve`: an HTTP front that binds the authenticated principal per request
//! - Configuration file resolution and display

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod serve;

pub use error::{Error, Result};
