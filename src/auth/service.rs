//! Token Service seam consumed by the gate.

use thiserror::Error;

use super::types::{NewToken, Principal};
use crate::jwt::Claims;

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Signature is fine but `exp` is in the past.
    #[error("token has expired")]
    Expired,
    /// Malformed, wrong signature, or missing required claims.
    #[error("token is invalid")]
    Invalid,
}

/// Why a token could not be exchanged for a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The token's refresh window has closed; the user must log in again.
    #[error("refresh window exceeded")]
    WindowExceeded,
    #[error("token is invalid")]
    Invalid,
    #[error("failed to sign new token")]
    Encoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("token claims are unreadable")]
pub struct ClaimsError;

/// Issues, verifies and refreshes identity tokens.
///
/// Calls are synchronous and may run inline on the request task.
pub trait TokenService: Send + Sync {
    /// Verify signature and expiry and resolve the token to its principal.
    fn verify(&self, token: &str) -> Result<Principal, VerifyError>;

    /// Exchange a (possibly expired) token for a freshly minted one.
    fn refresh(&self, token: &str) -> Result<NewToken, RefreshError>;

    /// Read the claims of a token whose signature is valid.
    fn read_claims(&self, token: &str) -> Result<Claims, ClaimsError>;
}
