//! Session endpoints.
//!
//! - GET `/verify` - 200 when the request's token is accepted
//! - GET `/me` - The verified principal

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::auth::{Authenticated, Principal};

pub fn router() -> Router {
    Router::new()
        .route("/verify", get(verify_token))
        .route("/me", get(me))
}

/// Lightweight auth check for the frontend (e.g. on page restore).
/// A refreshed token rides back on this response like on any other.
async fn verify_token(Authenticated(_principal): Authenticated) -> impl IntoResponse {
    StatusCode::OK
}

async fn me(Authenticated(principal): Authenticated) -> Json<Principal> {
    Json(principal)
}
