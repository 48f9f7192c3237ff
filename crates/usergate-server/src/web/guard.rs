//! Server-side route guard for the HTML pages.
//!
//! Requests to a protected path prefix must carry a valid session token
//! cookie; otherwise the browser is sent to `/login`. The JSON API does its
//! own check through [`AuthUser`](crate::web::api::middleware::AuthUser) and
//! answers 401 instead of redirecting.

use crate::state::AppState;
use crate::web::api::middleware::session_token;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

/// `/dashboard` protects `/dashboard` and `/dashboard/...`, not `/dashboards`.
pub fn is_protected(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    })
}

pub fn decide(path: &str, prefixes: &[String], has_valid_token: bool) -> GuardDecision {
    if has_valid_token || !is_protected(path, prefixes) {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToLogin
    }
}

pub async fn route_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let prefixes = &state.config.auth.protected_prefixes;
    let path = request.uri().path();
    if !is_protected(path, prefixes) {
        return next.run(request).await;
    }

    let has_valid_token = match session_token(&jar).map(|t| state.tokens.validate(t)) {
        Some(Ok(_)) => true,
        Some(Err(e)) => {
            tracing::debug!(path, "Rejected session token: {}", e);
            false
        }
        None => false,
    };

    match decide(path, prefixes, has_valid_token) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["/dashboard".to_string(), "/settings".to_string()]
    }

    #[test]
    fn test_prefix_matching() {
        let prefixes = defaults();
        assert!(is_protected("/dashboard", &prefixes));
        assert!(is_protected("/dashboard/x", &prefixes));
        assert!(is_protected("/settings/profile", &prefixes));
        assert!(!is_protected("/dashboards", &prefixes));
        assert!(!is_protected("/login", &prefixes));
        assert!(!is_protected("/", &prefixes));
    }

    #[test]
    fn test_prefix_with_trailing_slash() {
        let prefixes = vec!["/admin/".to_string()];
        assert!(is_protected("/admin", &prefixes));
        assert!(is_protected("/admin/users", &prefixes));
        assert!(!is_protected("/administrator", &prefixes));
    }

    #[test]
    fn test_decide() {
        let prefixes = defaults();
        assert_eq!(
            decide("/dashboard", &prefixes, false),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(decide("/dashboard", &prefixes, true), GuardDecision::Allow);
        assert_eq!(decide("/login", &prefixes, false), GuardDecision::Allow);
        assert_eq!(decide("/login", &prefixes, true), GuardDecision::Allow);
    }

    #[test]
    fn test_decide_without_prefixes() {
        assert_eq!(decide("/dashboard", &[], false), GuardDecision::Allow);
    }
}
