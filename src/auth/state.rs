//! Gate configuration and the deployment-environment cookie policy.

use super::cookie::{CookiePolicy, SameSite};
use crate::jwt::DEFAULT_TTL_MINUTES;

/// Default proactive refresh threshold: 10 minutes before expiry.
pub const DEFAULT_REFRESH_THRESHOLD_SECS: u64 = 600;

/// Deployment environment, as named by `APP_ENV`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Development,
    Testing,
    Staging,
    #[default]
    Production,
}

impl AppEnv {
    /// Cookies are only sent without `Secure` in local-style environments.
    pub fn secure_cookies(self) -> bool {
        !matches!(self, AppEnv::Local | AppEnv::Development | AppEnv::Testing)
    }

    pub fn same_site(self) -> SameSite {
        match self {
            AppEnv::Production => SameSite::None,
            _ => SameSite::Lax,
        }
    }

    /// Cookie policy for this environment, with an optional `SameSite` override.
    /// `SameSite=None` is only honoured by browsers on secure cookies, so it forces `Secure`.
    pub fn cookie_policy(self, same_site_override: Option<SameSite>) -> CookiePolicy {
        let same_site = same_site_override.unwrap_or_else(|| self.same_site());
        let secure = self.secure_cookies() || same_site == SameSite::None;
        CookiePolicy { secure, same_site }
    }
}

/// Settings the gate applies to every request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateConfig {
    /// Refresh when fewer than this many seconds remain before `exp`.
    pub threshold_secs: u64,
    /// Lifetime of minted tokens, used for the cookie `Max-Age`.
    pub ttl_minutes: u64,
    pub cookie: CookiePolicy,
}

impl GateConfig {
    pub fn new(env: AppEnv) -> Self {
        Self {
            threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
            ttl_minutes: DEFAULT_TTL_MINUTES,
            cookie: env.cookie_policy(None),
        }
    }

    pub fn cookie_max_age(&self) -> u64 {
        self.ttl_minutes.saturating_mul(60)
    }
}
