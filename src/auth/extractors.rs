//! Axum extractors for handlers mounted behind the token gate.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::GateError;
use super::types::Principal;

/// The principal the gate verified for this request.
///
/// Only available on routes behind [`token_gate`](super::token_gate); anywhere
/// else the extractor rejects as if no token had been sent.
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Authenticated)
            .ok_or(GateError::MissingToken)
    }
}
