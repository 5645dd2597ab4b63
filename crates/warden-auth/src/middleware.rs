//! Tower middleware that authenticates requests and binds the principal.
//!
//! `PrincipalLayer` and `PrincipalService` wrap any inner service with
//! session authentication. Generic over `SessionValidator` - plug in any
//! identity provider.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::{Request, StatusCode};
use tower::{Layer, Service};

use crate::{AuthConfig, AuthError, SessionAuthenticator, SessionValidator, bind_principal};

/// Tower `Layer` that wraps services with session authentication.
pub struct PrincipalLayer<V: SessionValidator> {
    authenticator: SessionAuthenticator<V>,
    config: AuthConfig,
}

impl<V: SessionValidator> Clone for PrincipalLayer<V> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V: SessionValidator> PrincipalLayer<V> {
    /// Create a new layer with the given validator and config.
    pub fn new(validator: Arc<V>, config: AuthConfig) -> Self {
        Self {
            authenticator: SessionAuthenticator::new(validator),
            config,
        }
    }
}

impl<V: SessionValidator, S> Layer<S> for PrincipalLayer<V> {
    type Service = PrincipalService<V, S>;

    fn layer(&self, inner: S) -> Self::Service {
        PrincipalService {
            inner,
            authenticator: self.authenticator.clone(),
            config: self.config.clone(),
        }
    }
}

/// Tower `Service` that authenticates requests before forwarding them.
///
/// On success, binds the `CanonicalUser` into request extensions where
/// downstream handlers read it with [`get_principal`](crate::get_principal),
/// [`require_principal`](crate::require_principal), or the
/// [`Principal`](crate::Principal) extractor. On failure the inner service
/// is never called.
pub struct PrincipalService<V: SessionValidator, S> {
    inner: S,
    authenticator: SessionAuthenticator<V>,
    config: AuthConfig,
}

impl<V: SessionValidator, S: Clone> Clone for PrincipalService<V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            authenticator: self.authenticator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V, S> Service<Request<Body>> for PrincipalService<V, S>
where
    V: SessionValidator,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let authenticator = self.authenticator.clone();
        let config = self.config.clone();

        Box::pin(async move {
            // Dev mode - no auth required, no principal bound
            if !config.enabled {
                let resp = inner
                    .call(req)
                    .await
                    .unwrap_or_else(|infallible| match infallible {});
                return Ok(resp.into_response());
            }

            let (mut parts, body) = req.into_parts();

            let outcome = match authenticator.authenticate(&parts.headers).await {
                Ok(user) => {
                    let id = user.id.clone();
                    bind_principal(&mut parts.extensions, user).map(|()| id)
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(id) => {
                    log::debug!("Authenticated identity {id} for {}", parts.uri.path());
                    let resp = inner
                        .call(Request::from_parts(parts, body))
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Err(auth_err) => {
                    if auth_err.is_transport() {
                        log::error!("Authentication failed [{}]: {auth_err}", auth_err.kind());
                    } else {
                        log::warn!("Authentication failed [{}]: {auth_err}", auth_err.kind());
                    }
                    Ok(unauthorized_response(&auth_err))
                }
            }
        })
    }
}

/// Build a 401 Unauthorized response that reveals nothing beyond
/// [`AuthError::public_message`].
pub(crate) fn unauthorized_response(err: &AuthError) -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        [(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        err.public_message(),
    )
        .into_response()
}
