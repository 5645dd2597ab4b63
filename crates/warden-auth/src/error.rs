//! Auth-specific error types.

/// Message sent to the client when no credential was presented.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Session token required";

/// Message sent to the client for every other authentication failure.
pub const INVALID_SESSION_MESSAGE: &str = "Invalid session";

/// Errors that can occur while authenticating a request or talking to the
/// identity provider.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// No transport (bearer header, session header, cookie) yielded a token.
    #[error("missing session credential")]
    MissingCredential,

    /// A session token was handed to the gateway but it was empty.
    #[error("session token is empty")]
    EmptyCredential,

    /// The identity provider rejected the session or reported it inactive.
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// The identity provider could not be reached or answered garbage.
    #[error("identity provider transport error: {0}")]
    Transport(String),

    /// The identity record does not exist (or the provider would not return it).
    #[error("identity '{id}' not found (HTTP {status})")]
    NotFound {
        /// Identity ID that was looked up.
        id: String,
        /// Status code reported by the provider.
        status: u16,
    },

    /// The provider rejected a traits update.
    #[error("failed to update identity '{id}' (HTTP {status})")]
    UpdateFailed {
        /// Identity ID.
        id: String,
        /// Status code reported by the provider.
        status: u16,
    },

    /// The provider rejected an identity deletion.
    #[error("failed to delete identity '{id}' (HTTP {status})")]
    DeleteFailed {
        /// Identity ID.
        id: String,
        /// Status code reported by the provider.
        status: u16,
    },

    /// The provider refused to list an identity's sessions.
    #[error("failed to list sessions for identity '{id}' (HTTP {status})")]
    ListFailed {
        /// Identity ID.
        id: String,
        /// Status code reported by the provider.
        status: u16,
    },

    /// The provider refused to revoke a session.
    #[error("failed to revoke session '{id}' (HTTP {status})")]
    RevokeFailed {
        /// Session ID.
        id: String,
        /// Status code reported by the provider.
        status: u16,
    },

    /// A handler required a principal but none was bound to the request.
    #[error("no authenticated principal bound to request")]
    Unauthenticated,

    /// A principal was already bound to the request.
    #[error("a principal is already bound to this request")]
    PrincipalAlreadyBound,
}

impl AuthError {
    /// Whether this error is the caller's fault (bad or missing credential)
    /// rather than a provider or server-side problem.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredential
                | AuthError::EmptyCredential
                | AuthError::InvalidSession(_)
                | AuthError::Unauthenticated
        )
    }

    /// Whether the identity provider was unreachable or misbehaving.
    ///
    /// Callers still see a 401, but logs should tell these apart from
    /// genuine rejections.
    pub fn is_transport(&self) -> bool {
        matches!(self, AuthError::Transport(_))
    }

    /// The only text an unauthenticated client is ever shown.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => MISSING_CREDENTIAL_MESSAGE,
            _ => INVALID_SESSION_MESSAGE,
        }
    }

    /// Short stable name of the error kind, for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::EmptyCredential => "empty_credential",
            AuthError::InvalidSession(_) => "invalid_session",
            AuthError::Transport(_) => "transport",
            AuthError::NotFound { .. } => "not_found",
            AuthError::UpdateFailed { .. } => "update_failed",
            AuthError::DeleteFailed { .. } => "delete_failed",
            AuthError::ListFailed { .. } => "list_failed",
            AuthError::RevokeFailed { .. } => "revoke_failed",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::PrincipalAlreadyBound => "principal_already_bound",
        }
    }
}
