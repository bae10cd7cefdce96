//! Tests for the route command

use feedly::commands::route::{self, TokenSource};
use feedly::GuardDecision;
use httpmock::MockServer;

use super::context;

#[test]
fn test_route_without_token_redirects_to_login() {
    let server = MockServer::start();
    let (ctx, _dir) = context(&server, false);

    let decision = route::run(&ctx, "/reports", &TokenSource::None).unwrap();
    assert_eq!(
        decision,
        GuardDecision::Redirect("/login?redirect=%2Freports".to_string())
    );
}

#[test]
fn test_route_with_stored_session_passes() {
    let server = MockServer::start();
    let (ctx, _dir) = context(&server, true);

    let decision = route::run(&ctx, "/settings", &TokenSource::Session).unwrap();
    assert_eq!(decision, GuardDecision::Pass);

    let decision = route::run(&ctx, "/signup", &TokenSource::Session).unwrap();
    assert_eq!(decision, GuardDecision::Redirect("/dashboard".to_string()));
}

#[test]
fn test_route_cookie_header_with_empty_token() {
    let server = MockServer::start();
    let (ctx, _dir) = context(&server, false);

    let source = TokenSource::CookieHeader("theme=dark; access_token=".to_string());
    let decision = route::evaluate(&ctx, "/apps", &source).unwrap();
    assert!(matches!(decision, GuardDecision::Redirect(_)));
}

#[test]
fn test_route_excluded_paths_pass() {
    let server = MockServer::start();
    let (ctx, _dir) = context(&server, false);

    for path in ["/api/applications", "/_next/static/app.js", "/favicon.ico"] {
        let decision = route::evaluate(&ctx, path, &TokenSource::None).unwrap();
        assert_eq!(decision, GuardDecision::Pass, "path {}", path);
    }
}
