//! Ory Kratos provider for Warden.
//!
//! Implements [`warden_auth::SessionValidator`] for Kratos:
//! - Session introspection via the public `/sessions/whoami` endpoint
//! - Identity and session administration via the admin API
//! - Email verification lookup with a recovery-address fallback
//! - Normalization of Kratos identities into [`warden_auth::CanonicalUser`]

mod client;
mod config;
mod types;
mod user;
mod validator;
pub mod verification;

pub use client::KratosClient;
pub use config::{DEFAULT_ADMIN_URL, DEFAULT_PUBLIC_URL, KratosConfig};
pub use types::{Identity, RecoveryAddress, Session, SessionSummary, VerifiableAddress};
pub use user::canonical_user;
pub use validator::KratosSessionValidator;
pub use verification::resolve_email_verified;
