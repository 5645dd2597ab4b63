//! Session authentication primitives for Warden.
//!
//! Provides:
//! - [`CanonicalUser`] - Identity normalized from the identity provider
//! - [`credential::extract`] - Picks the session token off a request
//! - [`traits::project`] - Total projection of free-form traits onto fixed fields
//! - [`SessionValidator`] - Trait for async session validation (implement per provider)
//! - [`SessionAuthenticator`] - Extract, validate, and normalize in one call
//! - [`PrincipalLayer`] / [`PrincipalService`] - Tower middleware binding the principal
//! - [`AuthError`] - Auth-specific error types

mod authenticator;
pub mod credential;
mod error;
mod middleware;
pub mod traits;
mod user;

use std::future::Future;
use std::pin::Pin;

pub use authenticator::SessionAuthenticator;
pub use credential::{Credential, Transport};
pub use error::{AuthError, INVALID_SESSION_MESSAGE, MISSING_CREDENTIAL_MESSAGE};
pub use middleware::{PrincipalLayer, PrincipalService};
pub use traits::{ProjectedTraits, TraitField};
pub use user::{
    CanonicalUser, Principal, Unauthenticated, bind_principal, get_principal, require_principal,
    user_from_parts,
};

/// Configuration for the principal middleware.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Whether authentication is enforced. When false, requests pass
    /// through without a principal bound.
    pub enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Boxed future returned by [`SessionValidator::validate`].
pub type ValidateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CanonicalUser, AuthError>> + Send + 'a>>;

/// Trait for validating a session credential and producing the user behind it.
///
/// Implement this for each identity provider. The returned user must be
/// fully populated; on error no partial user escapes.
pub trait SessionValidator: Send + Sync + 'static {
    /// Validate a credential and return the canonical user.
    fn validate<'a>(&'a self, credential: &'a Credential) -> ValidateFuture<'a>;
}
