//! JWT access-token gate.
//!
//! Every protected request must carry a token in `Authorization: Bearer` or the
//! `access_token` cookie. Tokens near expiry (or expired but still inside their
//! refresh window) are replaced transparently before the handler runs.

mod cookie;
mod errors;
mod extractors;
mod gate;
mod service;
mod state;
mod types;

pub use cookie::{
    ACCESS_COOKIE_NAME, CookiePolicy, SameSite, access_cookie, bearer_token, extract_token,
    get_cookie,
};
pub use errors::GateError;
pub use extractors::Authenticated;
pub use gate::{Outcome, TOKEN_EXPIRES_AT_HEADER, TokenGate, token_gate};
pub use service::{ClaimsError, RefreshError, TokenService, VerifyError};
pub use state::{AppEnv, DEFAULT_REFRESH_THRESHOLD_SECS, GateConfig};
pub use types::{NewToken, Principal};
