//! Extract, validate, and normalize a request's session in one step.

use std::sync::Arc;

use http::HeaderMap;

use crate::{AuthError, CanonicalUser, SessionValidator, credential};

/// Runs credential extraction followed by provider validation.
///
/// Stateless across calls: every request is validated against the provider
/// afresh.
pub struct SessionAuthenticator<V: SessionValidator> {
    validator: Arc<V>,
}

impl<V: SessionValidator> Clone for SessionAuthenticator<V> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
        }
    }
}

impl<V: SessionValidator> SessionAuthenticator<V> {
    /// Create an authenticator backed by `validator`.
    pub fn new(validator: Arc<V>) -> Self {
        Self { validator }
    }

    /// The underlying validator.
    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Authenticate a request from its headers.
    ///
    /// Fails with [`AuthError::MissingCredential`] when no transport carries
    /// a token; otherwise propagates the validator's error. Never returns a
    /// user with an empty ID.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<CanonicalUser, AuthError> {
        let credential = credential::extract(headers).ok_or(AuthError::MissingCredential)?;
        log::debug!("Session credential found via {}", credential.transport());

        let user = self.validator.validate(&credential).await?;
        if user.id.is_empty() {
            return Err(AuthError::InvalidSession("identity has no id".to_string()));
        }

        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Credential, Transport, ValidateFuture};
    use http::HeaderValue;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Accepts "good", reports "down" as a provider outage, rejects the rest.
    struct StubValidator {
        calls: AtomicUsize,
        id: &'static str,
    }

    impl StubValidator {
        fn new(id: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                id,
            }
        }
    }

    impl SessionValidator for StubValidator {
        fn validate<'a>(&'a self, credential: &'a Credential) -> ValidateFuture<'a> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                match credential.token() {
                    "good" => {
                        let mut user =
                            CanonicalUser::from_traits(self.id, json!({"email": "a@b.com"}));
                        user.active = credential.transport() == Transport::SessionHeader;
                        Ok(user)
                    }
                    "down" => Err(AuthError::Transport("connection refused".to_string())),
                    _ => Err(AuthError::InvalidSession("status 401".to_string())),
                }
            })
        }
    }

    fn session_header(token: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("x-session-token", HeaderValue::from_str(token).unwrap());
        h
    }

    #[tokio::test]
    async fn test_missing_credential_skips_validator() {
        let validator = Arc::new(StubValidator::new("u1"));
        let auth = SessionAuthenticator::new(validator.clone());
        let err = auth.authenticate(&HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_session() {
        let auth = SessionAuthenticator::new(Arc::new(StubValidator::new("u1")));
        let user = auth.authenticate(&session_header("good")).await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "a@b.com");
        assert!(user.active);
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let auth = SessionAuthenticator::new(Arc::new(StubValidator::new("u1")));
        assert!(matches!(
            auth.authenticate(&session_header("bad")).await,
            Err(AuthError::InvalidSession(_))
        ));
        assert!(matches!(
            auth.authenticate(&session_header("down")).await,
            Err(AuthError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_id_is_rejected() {
        let auth = SessionAuthenticator::new(Arc::new(StubValidator::new("")));
        assert!(matches!(
            auth.authenticate(&session_header("good")).await,
            Err(AuthError::InvalidSession(_))
        ));
    }
}
