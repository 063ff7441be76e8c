//! Token Freshness Gate.
//!
//! Runs in front of every protected route and decides, per request, between
//! three outcomes:
//!
//! - pass through: the token verified and has at least `threshold` seconds left
//! - refreshed: the token was expired (but still inside its refresh window) or
//!   close to expiry, and the Token Service minted a replacement; the response
//!   gets a new `access_token` cookie and an `X-Token-Expires-At` header
//! - rejected: 401 before the downstream handler is invoked
//!
//! At most one refresh happens per request, and always before the handler runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, warn};

use super::cookie::{access_cookie, extract_token};
use super::errors::GateError;
use super::service::{TokenService, VerifyError};
use super::state::GateConfig;
use super::types::{NewToken, Principal};
use crate::clock::Clock;

/// Response header carrying the refreshed token's expiry (Unix seconds).
pub const TOKEN_EXPIRES_AT_HEADER: &str = "x-token-expires-at";

/// Result of running the gate's checks on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    PassThrough(Principal),
    Refreshed(Principal, NewToken),
    Rejected(GateError),
}

/// Shared gate state. Immutable after construction.
pub struct TokenGate {
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
    config: GateConfig,
}

impl TokenGate {
    pub fn new(tokens: Arc<dyn TokenService>, clock: Arc<dyn Clock>, config: GateConfig) -> Self {
        Self {
            tokens,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Extract, authenticate and, if needed, refresh the request's token.
    pub fn evaluate(&self, headers: &HeaderMap) -> Outcome {
        let Some(token) = extract_token(headers) else {
            return Outcome::Rejected(GateError::MissingToken);
        };

        match self.tokens.verify(token) {
            Ok(principal) => self.check_remaining_lifetime(token, principal),
            Err(VerifyError::Expired) => self.refresh_expired(token),
            Err(VerifyError::Invalid) => Outcome::Rejected(GateError::InvalidToken),
        }
    }

    /// Expired token: one refresh attempt, and the new token is not re-checked
    /// against the threshold.
    fn refresh_expired(&self, token: &str) -> Outcome {
        let new_token = match self.tokens.refresh(token) {
            Ok(new_token) => new_token,
            Err(e) => {
                debug!(reason = %e, "Expired token could not be refreshed");
                return Outcome::Rejected(GateError::ExpiredUnrefreshable);
            }
        };

        match self.tokens.verify(&new_token.token) {
            Ok(principal) => {
                info!(
                    sub = %principal.sub,
                    expires_at = new_token.expires_at,
                    "Refreshed expired token"
                );
                Outcome::Refreshed(principal, new_token)
            }
            Err(e) => {
                error!(reason = %e, "Token service rejected a token it just minted");
                Outcome::Rejected(GateError::InvalidToken)
            }
        }
    }

    fn check_remaining_lifetime(&self, token: &str, principal: Principal) -> Outcome {
        let claims = match self.tokens.read_claims(token) {
            Ok(claims) => claims,
            Err(_) => return Outcome::Rejected(GateError::ClaimsUnreadable),
        };

        let now = self.clock.now();
        let time_left = claims.exp.saturating_sub(now);
        let fresh = now
            .checked_add(self.config.threshold_secs)
            .is_some_and(|deadline| claims.exp >= deadline);
        if fresh {
            debug!(sub = %principal.sub, time_left, "Token fresh, passing through");
            return Outcome::PassThrough(principal);
        }

        match self.tokens.refresh(token) {
            Ok(new_token) => {
                info!(
                    sub = %principal.sub,
                    time_left,
                    expires_at = new_token.expires_at,
                    "Refreshed token close to expiry"
                );
                Outcome::Refreshed(principal, new_token)
            }
            Err(e) => {
                debug!(reason = %e, time_left, "Proactive refresh failed");
                Outcome::Rejected(GateError::RefreshFailed)
            }
        }
    }

    /// Add the replacement cookie and expiry header to a downstream response.
    /// Either both headers are set or neither is.
    pub fn attach(&self, response: &mut Response, new_token: &NewToken) {
        let cookie = access_cookie(
            &new_token.token,
            self.config.cookie,
            self.config.cookie_max_age(),
        );
        let cookie = match HeaderValue::from_str(&cookie) {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "Refreshed token is not a valid cookie value");
                return;
            }
        };

        let headers = response.headers_mut();
        headers.append(header::SET_COOKIE, cookie);
        headers.insert(
            TOKEN_EXPIRES_AT_HEADER,
            HeaderValue::from(new_token.expires_at),
        );
    }
}

/// Middleware entry point. Mount with `axum::middleware::from_fn_with_state`.
pub async fn token_gate(
    State(gate): State<Arc<TokenGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    match gate.evaluate(request.headers()) {
        Outcome::PassThrough(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Outcome::Refreshed(principal, new_token) => {
            request.extensions_mut().insert(principal);
            let mut response = next.run(request).await;
            gate.attach(&mut response, &new_token);
            response
        }
        Outcome::Rejected(e) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = ?e,
                "Rejected request at token gate"
            );
            e.into_response()
        }
    }
}
