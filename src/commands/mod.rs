//! Command implementations
//!
//! One module per CLI subcommand group. Every command maps to an action a
//! dashboard page performs: it goes through the same route guard, calls
//! the same API service and prints what the page would show.

pub mod ai;
pub mod apps;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod report;
pub mod route;

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::api::ApiClient;
use crate::config::Config;
use crate::route_guard::{self, GuardDecision, LOGIN_PATH};
use crate::{Error, Result};

/// Everything a command needs: resolved configuration and an API client
/// bound to the session directory.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub client: ApiClient,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Apply the route guard to the page `path` the command stands for.
    /// A redirect to the login page means there is no session.
    pub fn require_page(&self, path: &str) -> Result<()> {
        let token = self.client.bearer_token();
        match route_guard::evaluate(path, token.as_deref()) {
            GuardDecision::Redirect(location) if location.starts_with(LOGIN_PATH) => {
                debug!(path, location = %location, "Guard redirected to login");
                Err(Error::NotAuthenticated)
            }
            _ => Ok(()),
        }
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(_) => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Single-line preview of free text, cut at `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
