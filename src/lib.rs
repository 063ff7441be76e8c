pub mod api;
pub mod auth;
pub mod cli;
pub mod clock;
pub mod jwt;

use api::create_api_router;
use auth::{GateConfig, TokenGate};
use axum::Router;
use clock::Clock;
use jwt::JwtConfig;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// How long after the first login a token chain may still be refreshed (minutes)
    pub refresh_ttl_minutes: u64,
    /// Threshold, token lifetime and cookie policy applied by the gate
    pub gate: GateConfig,
    /// Time source shared by the gate and the token service
    pub clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Token service matching this configuration.
    pub fn jwt(&self) -> JwtConfig {
        JwtConfig::new(&self.jwt_secret, self.clock.clone())
            .with_ttl(self.gate.ttl_minutes)
            .with_refresh_ttl(self.refresh_ttl_minutes)
    }
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let gate = Arc::new(TokenGate::new(
        Arc::new(config.jwt()),
        config.clock.clone(),
        config.gate,
    ));

    Router::new().nest("/api", create_api_router(gate))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
