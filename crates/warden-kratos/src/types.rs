//! Kratos wire types.
//!
//! Only the fields Warden reads are modelled; everything else in the
//! provider's payload is ignored on decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An active session and the identity it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID.
    pub id: String,
    /// Whether the session is live.
    pub active: bool,
    /// When the session expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the user authenticated.
    pub authenticated_at: Option<DateTime<Utc>>,
    /// When the session was issued.
    pub issued_at: Option<DateTime<Utc>>,
    /// The identity the session belongs to.
    pub identity: Identity,
}

/// Raw body of `GET /sessions/whoami`.
///
/// Kratos may leave out the identity, so it stays optional until the
/// session has been checked.
#[derive(Debug, Deserialize)]
pub(crate) struct WhoamiPayload {
    #[serde(flatten)]
    pub session: SessionSummary,
    #[serde(default)]
    pub identity: Option<Identity>,
}

impl WhoamiPayload {
    /// The session, if the payload carried an identity.
    pub fn into_session(self) -> Option<Session> {
        let SessionSummary {
            id,
            active,
            expires_at,
            authenticated_at,
            issued_at,
        } = self.session;
        Some(Session {
            id,
            active,
            expires_at,
            authenticated_at,
            issued_at,
            identity: self.identity?,
        })
    }
}

/// An identity record, from either the session payload or the admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    /// Identity ID.
    pub id: String,
    /// Identity schema the traits conform to.
    #[serde(default)]
    pub schema_id: String,
    /// `active` or `inactive`.
    #[serde(default)]
    pub state: Option<String>,
    /// Free-form traits, shaped by the identity schema.
    #[serde(default)]
    pub traits: Value,
    /// Addresses with an explicit verification status.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub verifiable_addresses: Vec<VerifiableAddress>,
    /// Addresses registered for account recovery.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recovery_addresses: Vec<RecoveryAddress>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A contact address with an explicit verified flag.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiableAddress {
    /// The address itself.
    #[serde(default)]
    pub value: String,
    /// Channel, e.g. `email` or `sms`.
    #[serde(default)]
    pub via: String,
    /// Whether the address has been verified.
    #[serde(default)]
    pub verified: bool,
}

/// A contact address registered for account recovery.
#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryAddress {
    /// The address itself.
    #[serde(default)]
    pub value: String,
    /// Channel, e.g. `email`.
    #[serde(default)]
    pub via: String,
}

/// One entry of `GET /admin/identities/{id}/sessions`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSummary {
    /// Session ID.
    #[serde(default)]
    pub id: String,
    /// Whether the session is live.
    #[serde(default)]
    pub active: bool,
    /// When the session expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// When the user authenticated.
    #[serde(default)]
    pub authenticated_at: Option<DateTime<Utc>>,
    /// When the session was issued.
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

/// Body of `PUT /admin/identities/{id}`.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateIdentityBody<'a> {
    pub traits: &'a Value,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
