mod session;

use axum::{Router, middleware};
use std::sync::Arc;

use crate::auth::{TokenGate, token_gate};

/// Create the API router. Every route is behind the token gate.
pub fn create_api_router(gate: Arc<TokenGate>) -> Router {
    Router::new()
        .nest("/session", session::router())
        .route_layer(middleware::from_fn_with_state(gate, token_gate))
}
