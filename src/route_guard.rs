//! Route guard for dashboard paths.
//!
//! Classifies a request path as protected, auth-only or public and decides
//! whether the request passes or gets redirected, based solely on the
//! presence of an `access_token` cookie. Token validity is never checked.

use crate::session::TOKEN_KEY;

/// Paths that require a session.
pub const PROTECTED_ROUTES: &[&str] = &["/dashboard", "/apps", "/chatbot", "/reports", "/settings"];

/// Paths only reachable without a session.
pub const AUTH_ROUTES: &[&str] = &[
    "/login",
    "/signup",
    "/verify-otp",
    "/forgot-password",
    "/reset-password",
];

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    AuthOnly,
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through unchanged.
    Pass,
    /// Redirect to the given location (path plus query).
    Redirect(String),
}

impl GuardDecision {
    pub fn location(&self) -> Option<&str> {
        match self {
            GuardDecision::Pass => None,
            GuardDecision::Redirect(location) => Some(location),
        }
    }
}

/// Prefix classification. Protected wins over auth-only.
pub fn classify(path: &str) -> RouteClass {
    if PROTECTED_ROUTES.iter().any(|route| path.starts_with(route)) {
        RouteClass::Protected
    } else if AUTH_ROUTES.iter().any(|route| path.starts_with(route)) {
        RouteClass::AuthOnly
    } else {
        RouteClass::Public
    }
}

/// Paths the guard never looks at: API calls, framework assets, the
/// favicon, and anything containing a dot (static files).
pub fn is_excluded(path: &str) -> bool {
    let trimmed = path.trim_start_matches('/');
    trimmed.starts_with("api") || trimmed.starts_with("_next") || trimmed.contains('.')
}

/// Decide what happens to a request for `path`.
///
/// An empty token counts as absent.
pub fn evaluate(path: &str, token: Option<&str>) -> GuardDecision {
    if is_excluded(path) {
        return GuardDecision::Pass;
    }

    let has_token = token.map(|t| !t.is_empty()).unwrap_or(false);

    match (classify(path), has_token) {
        (RouteClass::Protected, false) => GuardDecision::Redirect(login_redirect(path)),
        (RouteClass::AuthOnly, true) => GuardDecision::Redirect(HOME_PATH.to_string()),
        _ => GuardDecision::Pass,
    }
}

/// Same as [`evaluate`], reading the token out of a raw `Cookie` header.
pub fn evaluate_with_cookie_header(path: &str, cookie_header: Option<&str>) -> GuardDecision {
    let token = cookie_header.and_then(token_from_cookie_header);
    evaluate(path, token.as_deref())
}

/// `/login?redirect=<encoded path>`
pub fn login_redirect(path: &str) -> String {
    format!("{}?redirect={}", LOGIN_PATH, urlencoding::encode(path))
}

/// Extract the `access_token` value from a `Cookie` header.
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == TOKEN_KEY)
        .map(|(_, value)| {
            urlencoding::decode(value.trim())
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
}
