#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use std::sync::Arc;
use tokengate::{
    ServerConfig,
    auth::{AppEnv, GateConfig},
    clock::ManualClock,
    create_app,
    jwt::JwtConfig,
};

/// Fixed "now" for every test (2023-11-14T22:13:20Z).
pub const NOW: u64 = 1_700_000_000;

pub const TTL_MINUTES: u64 = 30;
pub const REFRESH_TTL_MINUTES: u64 = 120;
pub const THRESHOLD_SECS: u64 = 600;

pub struct TestApp {
    pub app: Router,
    pub clock: Arc<ManualClock>,
    pub jwt: JwtConfig,
}

impl TestApp {
    /// Mint a token for `sub` whose `exp` is `now + secs` (negative for expired).
    pub fn token_expiring_in(&self, sub: &str, secs: i64) -> String {
        let issue_at = NOW as i64 + secs - (TTL_MINUTES * 60) as i64;
        self.clock.set(issue_at as u64);
        let token = self.jwt.issue(sub).unwrap().token;
        self.clock.set(NOW);
        token
    }
}

pub fn test_config(env: AppEnv, clock: Arc<ManualClock>) -> ServerConfig {
    let mut gate = GateConfig::new(env);
    gate.threshold_secs = THRESHOLD_SECS;
    gate.ttl_minutes = TTL_MINUTES;

    ServerConfig {
        jwt_secret: b"test-jwt-secret-that-is-long-enough".to_vec(),
        refresh_ttl_minutes: REFRESH_TTL_MINUTES,
        gate,
        clock,
    }
}

pub fn create_test_app_for(env: AppEnv) -> TestApp {
    let clock = Arc::new(ManualClock::new(NOW));
    let config = test_config(env, clock.clone());

    TestApp {
        app: create_app(&config),
        jwt: config.jwt(),
        clock,
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_for(AppEnv::Local)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

/// Extract Set-Cookie headers from response
pub fn extract_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// The `access_token=...` cookie issued by the gate, if any.
pub fn new_access_cookie(response: &Response<Body>) -> Option<String> {
    extract_set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with("access_token="))
}

pub fn expires_at_header(response: &Response<Body>) -> Option<u64> {
    response
        .headers()
        .get("x-token-expires-at")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
