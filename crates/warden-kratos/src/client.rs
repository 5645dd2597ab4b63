//! Typed client for the Kratos public and admin APIs.
//!
//! Every call is a single request with no retry. Dropping the returned
//! future aborts the in-flight HTTP request, so cancelling an inbound
//! request cancels its Kratos lookups too.

use reqwest::{StatusCode, Url};
use serde_json::Value;

use warden_auth::AuthError;

use crate::config::KratosConfig;
use crate::types::{Identity, Session, SessionSummary, UpdateIdentityBody, WhoamiPayload};

/// Header Kratos reads the session token from on `/sessions/whoami`.
const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

/// Client for one Kratos deployment.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct KratosClient {
    http: reqwest::Client,
    public_url: Url,
    admin_url: Url,
}

impl KratosClient {
    /// Build a client from config, with the configured request timeout.
    pub fn new(config: &KratosConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthError::Transport(format!("failed to build HTTP client: {e}")))?;
        Self::with_http_client(http, config)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        config: &KratosConfig,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            http,
            public_url: parse_base(&config.public_url)?,
            admin_url: parse_base(&config.admin_url)?,
        })
    }

    /// Introspect a session token via `GET /sessions/whoami`.
    ///
    /// Returns the provider's session and identity verbatim. Fails with
    /// [`AuthError::InvalidSession`] on any non-200 status, an inactive
    /// session, or a session without an identity ID. `active` is checked
    /// before anything else in the payload.
    pub async fn validate_session(&self, token: &str) -> Result<Session, AuthError> {
        if token.is_empty() {
            return Err(AuthError::EmptyCredential);
        }

        let url = endpoint(&self.public_url, &["sessions", "whoami"])?;
        let response = self
            .http
            .get(url)
            .header(SESSION_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("session introspection failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let code = status.as_u16();
            return Err(AuthError::InvalidSession(format!("status {code}")));
        }

        let payload: WhoamiPayload = response.json().await.map_err(|e| {
            AuthError::Transport(format!("session response parse failed: {e}"))
        })?;

        if !payload.session.active {
            return Err(AuthError::InvalidSession("session is not active".into()));
        }

        let session = payload
            .into_session()
            .ok_or_else(|| AuthError::InvalidSession("session has no identity".into()))?;
        if session.identity.id.is_empty() {
            return Err(AuthError::InvalidSession("identity has no id".into()));
        }

        log::debug!(
            "Session {} is active for identity {}",
            session.id,
            session.identity.id
        );
        Ok(session)
    }

    /// Fetch an identity via `GET /admin/identities/{id}`.
    ///
    /// A 200 whose record has an empty ID is reported as
    /// [`AuthError::NotFound`].
    pub async fn get_identity(&self, id: &str) -> Result<Identity, AuthError> {
        let url = endpoint(&self.admin_url, &["admin", "identities", id])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("identity lookup failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::NotFound {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let identity: Identity = response
            .json()
            .await
            .map_err(|e| AuthError::Transport(format!("identity response parse failed: {e}")))?;
        if identity.id.is_empty() {
            return Err(AuthError::NotFound {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(identity)
    }

    /// Replace an identity's traits via `PUT /admin/identities/{id}`.
    ///
    /// The update response body is ignored; the identity is read back
    /// afterwards so the caller sees the fully resolved state.
    pub async fn update_identity(&self, id: &str, traits: &Value) -> Result<Identity, AuthError> {
        let url = endpoint(&self.admin_url, &["admin", "identities", id])?;
        let response = self
            .http
            .put(url)
            .json(&UpdateIdentityBody { traits })
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("identity update failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::UpdateFailed {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        log::debug!("Updated traits of identity {id}, reading back");
        self.get_identity(id).await
    }

    /// Delete an identity via `DELETE /admin/identities/{id}`.
    pub async fn delete_identity(&self, id: &str) -> Result<(), AuthError> {
        let url = endpoint(&self.admin_url, &["admin", "identities", id])?;
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("identity delete failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(AuthError::DeleteFailed {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    /// List an identity's sessions via `GET /admin/identities/{id}/sessions`.
    pub async fn list_sessions(&self, id: &str) -> Result<Vec<SessionSummary>, AuthError> {
        let url = endpoint(&self.admin_url, &["admin", "identities", id, "sessions"])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("session listing failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::ListFailed {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Transport(format!("sessions response parse failed: {e}")))
    }

    /// Revoke a session via `DELETE /admin/sessions/{id}`.
    pub async fn revoke_session(&self, session_id: &str) -> Result<(), AuthError> {
        let url = endpoint(&self.admin_url, &["admin", "sessions", session_id])?;
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("session revoke failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(AuthError::RevokeFailed {
                id: session_id.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

fn parse_base(url: &str) -> Result<Url, AuthError> {
    let parsed = Url::parse(url)
        .map_err(|e| AuthError::Transport(format!("invalid Kratos URL '{url}': {e}")))?;
    if parsed.cannot_be_a_base() {
        return Err(AuthError::Transport(format!("invalid Kratos URL '{url}'")));
    }
    Ok(parsed)
}

/// Append path segments to a base URL, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, AuthError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AuthError::Transport(format!("invalid Kratos URL '{base}'")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
