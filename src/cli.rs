//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::auth::{AppEnv, DEFAULT_REFRESH_THRESHOLD_SECS, GateConfig, SameSite};
use crate::clock::{Clock, SystemClock};
use crate::jwt::{
    DEFAULT_REFRESH_TTL_MINUTES, DEFAULT_TTL_MINUTES, MAX_REFRESH_TTL_MINUTES, MAX_TTL_MINUTES,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tokengate",
    about = "JWT access-token gate with transparent refresh"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "7291")]
    pub port: u16,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Token lifetime in minutes
    #[arg(long, env = "JWT_TTL", default_value_t = DEFAULT_TTL_MINUTES,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TTL_MINUTES))]
    pub jwt_ttl: u64,

    /// How long after login an expired token may still be refreshed, in minutes
    #[arg(long, env = "JWT_REFRESH_TTL", default_value_t = DEFAULT_REFRESH_TTL_MINUTES,
        value_parser = clap::value_parser!(u64).range(..=MAX_REFRESH_TTL_MINUTES))]
    pub jwt_refresh_ttl: u64,

    /// Refresh tokens that have fewer than this many seconds left
    #[arg(long, env = "JWT_REFRESH_THRESHOLD", default_value_t = DEFAULT_REFRESH_THRESHOLD_SECS)]
    pub refresh_threshold: u64,

    /// Deployment environment; decides the Secure and SameSite cookie flags
    #[arg(long, env = "APP_ENV", value_enum, default_value = "production")]
    pub app_env: AppEnv,

    /// Override the SameSite attribute derived from the environment
    #[arg(long, env = "COOKIE_SAME_SITE", value_enum)]
    pub same_site: Option<SameSite>,

    /// Print a freshly issued token for this subject on startup
    #[arg(long, value_name = "SUBJECT")]
    pub issue_token: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build the gate settings from the threshold, TTL and environment options.
pub fn gate_config(args: &Args) -> GateConfig {
    let cookie = args.app_env.cookie_policy(args.same_site);
    if args.same_site == Some(SameSite::None) && !args.app_env.secure_cookies() {
        warn!("SameSite=None requires Secure; access token cookies will be marked Secure");
    }

    let ttl_secs = args.jwt_ttl.saturating_mul(60);
    if args.refresh_threshold >= ttl_secs {
        warn!(
            threshold = args.refresh_threshold,
            ttl_secs,
            "Refresh threshold is not shorter than the token lifetime; every request will refresh"
        );
    }

    GateConfig {
        threshold_secs: args.refresh_threshold,
        ttl_minutes: args.jwt_ttl,
        cookie,
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(args: &Args, jwt_secret: String) -> ServerConfig {
    let gate = gate_config(args);
    info!(
        env = ?args.app_env,
        secure = gate.cookie.secure,
        same_site = gate.cookie.same_site.as_str(),
        threshold = gate.threshold_secs,
        ttl_minutes = gate.ttl_minutes,
        "Token gate configured"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    ServerConfig {
        jwt_secret: jwt_secret.into_bytes(),
        refresh_ttl_minutes: args.jwt_refresh_ttl,
        gate,
        clock,
    }
}

/// Handle the --issue-token flag: mint a token for `subject` and print it.
pub fn handle_issue_token(config: &ServerConfig, subject: &str) {
    match config.jwt().issue(subject) {
        Ok(issued) => {
            println!();
            println!("Token for {}: {}", subject, issued.token);
            println!("Expires at: {}", issued.expires_at);
            println!();
        }
        Err(e) => {
            error!(error = %e, "Failed to issue token");
            std::process::exit(1);
        }
    }
}
