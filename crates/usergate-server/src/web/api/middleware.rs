use crate::auth::TOKEN_TTL_SECS;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Extractor that validates the session token cookie and yields the account
/// it was issued for.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub account_id: Uuid,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar).ok_or(ApiError::Unauthenticated)?;
        let account_id = state.tokens.validate(token)?;
        Ok(AuthUser { account_id })
    }
}

/// The session token from the cookie jar, if present and non-empty
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(TOKEN_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value carrying a freshly issued token
pub fn token_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        TOKEN_COOKIE, token, TOKEN_TTL_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the token cookie
pub fn clear_token_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        TOKEN_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
