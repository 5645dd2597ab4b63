//! [`SessionValidator`] backed by Kratos.

use warden_auth::{AuthError, CanonicalUser, Credential, SessionValidator, ValidateFuture};

use crate::client::KratosClient;
use crate::user::canonical_user;
use crate::verification::resolve_email_verified;

/// Validates session tokens against Kratos and normalizes the identity.
///
/// Per call: introspect the session, project the identity's traits, take
/// `active` from the session, then resolve email verification with a
/// separate admin lookup. No caching between calls.
#[derive(Debug, Clone)]
pub struct KratosSessionValidator {
    client: KratosClient,
}

impl KratosSessionValidator {
    /// Create a validator using `client`.
    pub fn new(client: KratosClient) -> Self {
        Self { client }
    }

    /// The underlying Kratos client.
    pub fn client(&self) -> &KratosClient {
        &self.client
    }

    /// Validate a raw session token.
    pub async fn validate_token(&self, token: &str) -> Result<CanonicalUser, AuthError> {
        let session = self.client.validate_session(token).await?;

        let mut user = canonical_user(&session.identity);
        user.active = session.active;
        user.email_verified = resolve_email_verified(&self.client, &session.identity.id).await;

        Ok(user)
    }
}

impl SessionValidator for KratosSessionValidator {
    fn validate<'a>(&'a self, credential: &'a Credential) -> ValidateFuture<'a> {
        Box::pin(async move { self.validate_token(credential.token()).await })
    }
}
