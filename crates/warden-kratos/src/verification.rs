//! Email verification status lookup.
//!
//! Kratos deployments disagree on where verification lives. Newer schemas
//! populate `verifiable_addresses` with an explicit flag; older ones only
//! register recovery addresses. Both are consulted, strictest first.

use crate::client::KratosClient;
use crate::types::Identity;

const EMAIL_CHANNEL: &str = "email";

/// Which evidence settled the verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationSource {
    /// A verifiable email address flagged verified.
    VerifiableAddress,
    /// An email recovery address exists (permissive fallback).
    RecoveryAddress,
    /// No evidence found.
    None,
}

impl VerificationSource {
    /// Whether this source counts as verified.
    pub fn is_verified(self) -> bool {
        !matches!(self, VerificationSource::None)
    }
}

/// Decide verification status from an identity record.
pub fn verification_source(identity: &Identity) -> VerificationSource {
    if identity
        .verifiable_addresses
        .iter()
        .any(|a| a.via == EMAIL_CHANNEL && a.verified)
    {
        return VerificationSource::VerifiableAddress;
    }

    if identity
        .recovery_addresses
        .iter()
        .any(|a| a.via == EMAIL_CHANNEL)
    {
        return VerificationSource::RecoveryAddress;
    }

    VerificationSource::None
}

/// Look up whether identity `id` has a verified email address.
///
/// Fetches the admin identity record. Any lookup failure resolves to
/// `false`; this never errors.
pub async fn resolve_email_verified(client: &KratosClient, id: &str) -> bool {
    let identity = match client.get_identity(id).await {
        Ok(identity) => identity,
        Err(e) => {
            log::warn!("Email verification lookup for {id} failed, treating as unverified: {e}");
            return false;
        }
    };

    let source = verification_source(&identity);
    log::debug!("Email verification for {id}: {source:?}");
    source.is_verified()
}
