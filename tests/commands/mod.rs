//! Command-level tests against a mock Feedly API.

mod test_apps;
mod test_auth;
mod test_chat;
mod test_report;
mod test_route;

use feedly::commands::Context;
use feedly::session::{SessionStore, TOKEN_KEY};
use feedly::Config;
use httpmock::MockServer;
use tempfile::TempDir;

/// Context pointed at `server` with a fresh session directory.
pub fn context(server: &MockServer, signed_in: bool) -> (Context, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    if signed_in {
        let session = SessionStore::new(dir.path());
        session.set_item(TOKEN_KEY, "test-token").unwrap();
        session.set_cookie(TOKEN_KEY, "test-token", 7).unwrap();
    }
    let config = Config::defaults()
        .with_api_url(&server.base_url())
        .with_session_dir(dir.path());
    (Context::new(config).unwrap(), dir)
}
