//! Canonical user identity and the per-request principal binding.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use http::Extensions;
use http::request::Parts;
use serde::Serialize;
use serde_json::Value;

use crate::AuthError;
use crate::traits::{ProjectedTraits, TraitField};

/// A user identity normalized from the identity provider.
///
/// Built by a [`SessionValidator`](crate::SessionValidator) and bound to the
/// request by the principal middleware.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalUser {
    /// Stable identity ID from the provider. Never empty.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    pub phone: String,
    /// Subscription plan identifier.
    pub subscription_plan: String,
    /// Avatar URL.
    pub avatar: String,
    /// Whether the email address is known to be verified. Fails closed.
    pub email_verified: bool,
    /// Whether the live session is active. Always false for identity-only lookups.
    pub active: bool,
    /// When the identity was created, as reported by the provider.
    pub created_at: Option<DateTime<Utc>>,
    /// When the identity was last updated, as reported by the provider.
    pub updated_at: Option<DateTime<Utc>>,
    /// The provider's trait bag, untouched.
    #[serde(rename = "traits")]
    pub raw_traits: Value,
}

impl CanonicalUser {
    /// Build a user from an identity ID and its raw trait bag.
    ///
    /// The fixed fields are projected out of `traits`; `email_verified` and
    /// `active` start false and timestamps start unset.
    pub fn from_traits(id: impl Into<String>, traits: Value) -> Self {
        let ProjectedTraits {
            email,
            username,
            first_name,
            last_name,
            phone,
            subscription_plan,
            avatar,
        } = ProjectedTraits::from_traits(&traits);

        Self {
            id: id.into(),
            email,
            username,
            first_name,
            last_name,
            phone,
            subscription_plan,
            avatar,
            email_verified: false,
            active: false,
            created_at: None,
            updated_at: None,
            raw_traits: traits,
        }
    }

    /// Set provider timestamps.
    pub fn with_timestamps(
        mut self,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Value of one of the projected trait fields.
    pub fn field(&self, field: TraitField) -> &str {
        match field {
            TraitField::Email => &self.email,
            TraitField::Username => &self.username,
            TraitField::FirstName => &self.first_name,
            TraitField::LastName => &self.last_name,
            TraitField::Phone => &self.phone,
            TraitField::SubscriptionPlan => &self.subscription_plan,
            TraitField::Avatar => &self.avatar,
        }
    }
}

/// Request-extension wrapper for the bound user.
///
/// The type is private to this module, so nothing but [`bind_principal`]
/// can put a principal into a request.
#[derive(Clone)]
struct Bound(Arc<CanonicalUser>);

/// Bind `user` as the request's principal.
///
/// A request carries at most one principal; a second bind is refused.
pub fn bind_principal(extensions: &mut Extensions, user: CanonicalUser) -> Result<(), AuthError> {
    if extensions.get::<Bound>().is_some() {
        return Err(AuthError::PrincipalAlreadyBound);
    }
    extensions.insert(Bound(Arc::new(user)));
    Ok(())
}

/// The principal bound to a request, if the middleware ran and succeeded.
pub fn get_principal(extensions: &Extensions) -> Option<&CanonicalUser> {
    extensions.get::<Bound>().map(|b| b.0.as_ref())
}

/// The principal bound to a request, or [`AuthError::Unauthenticated`].
pub fn require_principal(extensions: &Extensions) -> Result<&CanonicalUser, AuthError> {
    get_principal(extensions).ok_or(AuthError::Unauthenticated)
}

/// Extract the principal from HTTP request `Parts`, if present.
pub fn user_from_parts(parts: &Parts) -> Option<&CanonicalUser> {
    get_principal(&parts.extensions)
}

/// Axum extractor for the authenticated principal.
///
/// Rejects with 401 when the principal middleware did not run.
#[derive(Debug, Clone)]
pub struct Principal(pub Arc<CanonicalUser>);

impl std::ops::Deref for Principal {
    type Target = CanonicalUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection returned by the [`Principal`] extractor.
#[derive(Debug)]
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        crate::middleware::unauthorized_response(&AuthError::Unauthenticated)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Bound>()
            .map(|b| Principal(b.0.clone()))
            .ok_or(Unauthenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> CanonicalUser {
        CanonicalUser::from_traits(
            "u1",
            json!({"email": "alice@example.com", "first_name": "Alice", "plan": 3}),
        )
    }

    fn parts() -> Parts {
        let (parts, _body) = http::Request::new(()).into_parts();
        parts
    }

    #[test]
    fn test_from_traits_projects_and_keeps_bag() {
        let user = alice();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.last_name, "");
        assert!(!user.email_verified);
        assert!(!user.active);
        assert_eq!(user.raw_traits["plan"], 3);
    }

    #[test]
    fn test_require_principal_unbound() {
        let p = parts();
        assert!(get_principal(&p.extensions).is_none());
        assert!(matches!(
            require_principal(&p.extensions),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_bind_then_get() {
        let mut p = parts();
        bind_principal(&mut p.extensions, alice()).unwrap();
        assert_eq!(require_principal(&p.extensions).unwrap().id, "u1");
        assert_eq!(user_from_parts(&p).unwrap().email, "alice@example.com");
    }

    #[test]
    fn test_bind_is_write_once() {
        let mut p = parts();
        bind_principal(&mut p.extensions, alice()).unwrap();
        let other = CanonicalUser::from_traits("u2", Value::Null);
        assert!(matches!(
            bind_principal(&mut p.extensions, other),
            Err(AuthError::PrincipalAlreadyBound)
        ));
        assert_eq!(get_principal(&p.extensions).unwrap().id, "u1");
    }

    #[test]
    fn test_plain_canonical_user_in_extensions_is_not_a_principal() {
        let mut p = parts();
        p.extensions.insert(alice());
        assert!(get_principal(&p.extensions).is_none());
    }

    #[tokio::test]
    async fn test_principal_extractor() {
        let mut p = parts();
        assert!(Principal::from_request_parts(&mut p, &()).await.is_err());

        bind_principal(&mut p.extensions, alice()).unwrap();
        let principal = Principal::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(principal.email, "alice@example.com");
    }

    #[test]
    fn test_serializes_traits_under_traits_key() {
        let v = serde_json::to_value(alice()).unwrap();
        assert_eq!(v["id"], "u1");
        assert_eq!(v["traits"]["first_name"], "Alice");
        assert_eq!(v["email_verified"], false);
    }
}
