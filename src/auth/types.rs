//! Authentication value types.

use serde::Serialize;

/// Verified identity attached to a request that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Subject the token was issued to
    pub sub: String,
    /// Token ID of the token that was verified
    pub jti: String,
}

/// A token minted by the Token Service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToken {
    /// The signed token string
    pub token: String,
    /// Absolute expiry (Unix seconds)
    pub expires_at: u64,
}
