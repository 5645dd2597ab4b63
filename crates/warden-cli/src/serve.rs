//! Session-guarded HTTP front.
//!
//! `GET /healthz` is open; everything under the protected router requires a
//! valid Kratos session and sees the bound principal.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use warden_auth::{AuthConfig, CanonicalUser, Principal, PrincipalLayer, SessionValidator};

use crate::{Error, Result};

/// Build the application router around any session validator.
pub fn router<V: SessionValidator>(validator: Arc<V>, auth: AuthConfig) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .layer(PrincipalLayer::new(validator, auth));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(protected)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn me(principal: Principal) -> Json<CanonicalUser> {
    Json(principal.0.as_ref().clone())
}

/// Bind `addr` and serve `app` until Ctrl-C.
pub async fn run(addr: &str, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::io_with_path(e, addr))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::io_with_path(e, addr))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;
    use warden_auth::{AuthError, Credential, ValidateFuture};

    struct FixedValidator;

    impl SessionValidator for FixedValidator {
        fn validate<'a>(&'a self, credential: &'a Credential) -> ValidateFuture<'a> {
            Box::pin(async move {
                if credential.token() == "abc" {
                    let mut user = CanonicalUser::from_traits("u1", json!({"email": "a@b.com"}));
                    user.active = true;
                    Ok(user)
                } else {
                    Err(AuthError::InvalidSession("status 401".to_string()))
                }
            })
        }
    }

    fn app() -> Router {
        router(Arc::new(FixedValidator), AuthConfig::default())
    }

    #[tokio::test]
    async fn test_healthz_is_open() {
        let req = Request::builder()
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let req = Request::builder().uri("/me").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_principal() {
        let req = Request::builder()
            .uri("/me")
            .header("Authorization", "Bearer abc")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let user: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(user["id"], "u1");
        assert_eq!(user["active"], true);
    }
}
