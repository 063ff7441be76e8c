//! Token transport: reading the bearer header and cookie, writing the
//! replacement cookie.

use axum::http::{HeaderMap, header};

/// Cookie name for the access token.
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// `SameSite` attribute for the access token cookie.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied to every access token cookie we write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Extract the token from `Authorization: Bearer <token>`.
/// The scheme is matched case-insensitively; other schemes are ignored.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Find the request's token: bearer header first, then the cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    bearer_token(headers).or_else(|| {
        get_cookie(headers, ACCESS_COOKIE_NAME).filter(|token| !token.is_empty())
    })
}

/// Build the `Set-Cookie` value carrying a replacement access token.
pub fn access_cookie(token: &str, policy: CookiePolicy, max_age_secs: u64) -> String {
    let secure = if policy.secure { " Secure;" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly;{} SameSite={}; Max-Age={}",
        ACCESS_COOKIE_NAME,
        token,
        secure,
        policy.same_site.as_str(),
        max_age_secs
    )
}
