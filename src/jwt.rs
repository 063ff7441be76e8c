//! JWT token generation, validation and refresh.
//!
//! Tokens are HS256-signed and carry an `orig_iat` claim marking the start of
//! the refresh window. A token may be exchanged for a new one (even after it
//! has expired) until `orig_iat + refresh_ttl` has passed.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{ClaimsError, NewToken, Principal, RefreshError, TokenService, VerifyError};
use crate::clock::Clock;

/// Default access token lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: u64 = 30;

/// Default refresh window in minutes: 2 weeks
pub const DEFAULT_REFRESH_TTL_MINUTES: u64 = 14 * 24 * 60;

/// Longest accepted access token lifetime in minutes: 1 year
pub const MAX_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Longest accepted refresh window in minutes: 10 years
pub const MAX_REFRESH_TTL_MINUTES: u64 = 10 * 365 * 24 * 60;

/// JWT claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,
    /// JWT ID, unique per minted token
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issue time of the first token in the refresh chain (Unix timestamp)
    pub orig_iat: u64,
}

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: u64,
    refresh_ttl_minutes: u64,
    clock: Arc<dyn Clock>,
}

/// Errors that can occur while minting a token.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("failed to encode token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("token expiry does not fit in a Unix timestamp")]
    ExpiryOverflow,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and default lifetimes.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_minutes: DEFAULT_TTL_MINUTES,
            refresh_ttl_minutes: DEFAULT_REFRESH_TTL_MINUTES,
            clock,
        }
    }

    pub fn with_ttl(mut self, ttl_minutes: u64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    pub fn with_refresh_ttl(mut self, refresh_ttl_minutes: u64) -> Self {
        self.refresh_ttl_minutes = refresh_ttl_minutes;
        self
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_minutes.saturating_mul(60)
    }

    /// Issue the first token of a new refresh chain for `subject`.
    pub fn issue(&self, subject: &str) -> Result<NewToken, JwtError> {
        let now = self.clock.now();
        self.mint(subject, now, now)
    }

    fn mint(&self, subject: &str, now: u64, orig_iat: u64) -> Result<NewToken, JwtError> {
        let exp = now
            .checked_add(self.ttl_secs())
            .ok_or(JwtError::ExpiryOverflow)?;

        let claims = Claims {
            sub: subject.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp,
            orig_iat,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(NewToken {
            token,
            expires_at: exp,
        })
    }

    /// Check the signature and decode claims without judging expiry.
    /// Expiry is decided against our own clock, not the library's.
    fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
    }
}

impl TokenService for JwtConfig {
    fn verify(&self, token: &str) -> Result<Principal, VerifyError> {
        let claims = self.decode(token).map_err(|_| VerifyError::Invalid)?;

        if claims.exp < self.clock.now() {
            return Err(VerifyError::Expired);
        }

        Ok(Principal {
            sub: claims.sub,
            jti: claims.jti,
        })
    }

    fn refresh(&self, token: &str) -> Result<NewToken, RefreshError> {
        let claims = self.decode(token).map_err(|_| RefreshError::Invalid)?;
        let now = self.clock.now();

        let window_closes_at = claims
            .orig_iat
            .saturating_add(self.refresh_ttl_minutes.saturating_mul(60));
        if window_closes_at < now {
            return Err(RefreshError::WindowExceeded);
        }

        self.mint(&claims.sub, now, claims.orig_iat).map_err(|e| {
            tracing::error!(error = %e, "Failed to mint refreshed token");
            RefreshError::Encoding
        })
    }

    fn read_claims(&self, token: &str) -> Result<Claims, ClaimsError> {
        self.decode(token).map_err(|_| ClaimsError)
    }
}
