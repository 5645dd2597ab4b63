//! Normalization of Kratos identities into [`CanonicalUser`].

use serde_json::Value;

use warden_auth::{AuthError, CanonicalUser};

use crate::client::KratosClient;
use crate::types::Identity;
use crate::verification::verification_source;

/// Build a user from an identity record.
///
/// `active` and `email_verified` are left false; callers set them from the
/// evidence they hold.
pub fn canonical_user(identity: &Identity) -> CanonicalUser {
    CanonicalUser::from_traits(identity.id.clone(), identity.traits.clone())
        .with_timestamps(identity.created_at, identity.updated_at)
}

/// Build a user from an admin identity record, reading verification off the
/// same record.
fn admin_user(identity: &Identity) -> CanonicalUser {
    let mut user = canonical_user(identity);
    user.email_verified = verification_source(identity).is_verified();
    user
}

impl KratosClient {
    /// Identity-only lookup of a user, with email verification resolved.
    ///
    /// `active` is always false: no live session is involved. An identity
    /// with an empty ID is [`AuthError::NotFound`].
    pub async fn get_user(&self, id: &str) -> Result<CanonicalUser, AuthError> {
        let identity = self.get_identity(id).await?;
        Ok(admin_user(&identity))
    }

    /// Replace a user's traits and return the re-read user.
    pub async fn update_user(&self, id: &str, traits: &Value) -> Result<CanonicalUser, AuthError> {
        let identity = self.update_identity(id, traits).await?;
        Ok(admin_user(&identity))
    }
}
