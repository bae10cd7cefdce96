//! Evaluate the route guard for a path, the way the edge middleware would.

use super::Context;
use crate::route_guard::{self, GuardDecision};
use crate::Result;

/// Where the token comes from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// A raw `Cookie` request header.
    CookieHeader(String),
    /// The token value itself.
    Token(String),
    /// The stored session cookie jar.
    Session,
    None,
}

pub fn evaluate(ctx: &Context, path: &str, source: &TokenSource) -> Result<GuardDecision> {
    let decision = match source {
        TokenSource::CookieHeader(header) => {
            route_guard::evaluate_with_cookie_header(path, Some(header.as_str()))
        }
        TokenSource::Token(token) => route_guard::evaluate(path, Some(token.as_str())),
        TokenSource::Session => {
            let header = match ctx.client.session() {
                Some(session) => session.cookie_header()?,
                None => None,
            };
            route_guard::evaluate_with_cookie_header(path, header.as_deref())
        }
        TokenSource::None => route_guard::evaluate(path, None),
    };
    Ok(decision)
}

pub fn run(ctx: &Context, path: &str, source: &TokenSource) -> Result<GuardDecision> {
    let decision = evaluate(ctx, path, source)?;
    let class = if route_guard::is_excluded(path) {
        "excluded"
    } else {
        match route_guard::classify(path) {
            route_guard::RouteClass::Protected => "protected",
            route_guard::RouteClass::AuthOnly => "auth-only",
            route_guard::RouteClass::Public => "public",
        }
    };
    match &decision {
        GuardDecision::Pass => println!("✅ {} ({}): pass", path, class),
        GuardDecision::Redirect(location) => {
            println!("↪️ {} ({}): redirect to {}", path, class, location)
        }
    }
    Ok(decision)
}
