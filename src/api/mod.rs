//! Feedly REST API client.
//!
//! One [`ApiClient`] carries the HTTP connection pool, the base URL and
//! (optionally) the session store the bearer token is read from. The
//! endpoint groups live in submodules as extra `impl ApiClient` blocks:
//! - `auth`: account lifecycle and sign-in
//! - `apps`: application CRUD, reviews, analytics, dashboard stats
//! - `chat`: conversations and messages
//! - `ai`: direct sentiment / generation calls
//!
//! Every call is exactly one request: no retries, no caching. A non-2xx
//! answer becomes [`Error::Api`] carrying the server's `detail` or the
//! operation's fallback message.

pub mod ai;
pub mod apps;
pub mod auth;
pub mod chat;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::metrics;
use crate::session::SessionStore;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Option<SessionStore>,
}

impl ApiClient {
    /// Client for the configured API, reading tokens from the configured
    /// session directory.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(format!("feedly_client/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            session: Some(SessionStore::from_config(config)),
        })
    }

    /// Client with a custom base URL and no session (primarily for tests).
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("feedly_client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        })
    }

    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Option<&SessionStore> {
        self.session.as_ref()
    }

    /// Current bearer token, re-read on every call like the browser does.
    pub fn bearer_token(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.token_or_none())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and hand back the raw response, whatever its status.
    ///
    /// `endpoint` is the path template used as metrics label.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &'static str,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.bearer_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, path = path, "API request");

        match request.send().await {
            Ok(response) => {
                metrics::record_api_request(
                    method.as_str(),
                    endpoint,
                    response.status().as_str(),
                );
                Ok(response)
            }
            Err(e) => {
                metrics::record_api_request(method.as_str(), endpoint, "transport");
                warn!(method = %method, path = path, error = %e, "API request failed");
                Err(Error::Http(e.to_string()))
            }
        }
    }

    /// Send a request and decode a JSON body from a 2xx answer.
    pub(crate) async fn call<B, T>(
        &self,
        method: Method,
        endpoint: &'static str,
        path: &str,
        body: Option<&B>,
        fallback: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, endpoint, path, body).await?;
        let response = ensure_success(response, fallback).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::SerializationError(format!("Unexpected response from {}: {} ({})", path, e, text))
        })
    }

    /// Send a request whose 2xx body is irrelevant.
    pub(crate) async fn call_unit<B>(
        &self,
        method: Method,
        endpoint: &'static str,
        path: &str,
        body: Option<&B>,
        fallback: &str,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let response = self.send(method, endpoint, path, body).await?;
        ensure_success(response, fallback).await?;
        Ok(())
    }
}

/// Placeholder body type for requests without one.
pub(crate) const NO_BODY: Option<&Value> = None;

/// Turn a non-2xx response into [`Error::Api`].
async fn ensure_success(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = detail_message(&text).unwrap_or_else(|| fallback.to_string());
    warn!(status = status.as_u16(), message = %message, "API request rejected");

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

/// Extract the server's `detail` field. FastAPI sends either a string or a
/// list of validation errors (`[{"loc": [...], "msg": "..."}]`).
pub fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn detail_message_string() {
        assert_eq!(
            detail_message(r#"{"detail": "App not found"}"#).as_deref(),
            Some("App not found")
        );
    }

    #[test]
    fn detail_message_validation_list() {
        let body = json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "field required", "type": "value_error.missing"},
                {"loc": ["body", "password"], "msg": "field required", "type": "value_error.missing"}
            ]
        })
        .to_string();
        assert_eq!(
            detail_message(&body).as_deref(),
            Some("field required; field required")
        );
    }

    #[test]
    fn detail_message_absent_or_not_json() {
        assert_eq!(detail_message(r#"{"error": "nope"}"#), None);
        assert_eq!(detail_message("<html>502</html>"), None);
        assert_eq!(detail_message(r#"{"detail": ""}"#), None);
    }

    #[tokio::test]
    async fn bearer_header_attached_from_session() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ping")
                .header("authorization", "Bearer stored-token")
                .header("content-type", "application/json");
            then.status(200).json_body(json!({"ok": true}));
        });

        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path());
        session.set_item(crate::session::TOKEN_KEY, "stored-token").unwrap();

        let client = ApiClient::with_base_url(server.base_url())
            .unwrap()
            .with_session(session);
        let body: Value = client
            .call(Method::GET, "/ping", "/ping", NO_BODY, "Ping failed")
            .await
            .unwrap();

        assert_eq!(body, json!({"ok": true}));
        mock.assert();
    }

    #[tokio::test]
    async fn no_authorization_header_without_token() {
        let server = MockServer::start_async().await;
        let with_auth = server.mock(|when, then| {
            when.method(GET).path("/ping").header_exists("authorization");
            then.status(500);
        });
        let without_auth = server.mock(|when, then| {
            when.method(GET).path("/ping");
            then.status(200).json_body(json!({}));
        });

        let client = ApiClient::with_base_url(server.base_url()).unwrap();
        let _: Value = client
            .call(Method::GET, "/ping", "/ping", NO_BODY, "Ping failed")
            .await
            .unwrap();

        with_auth.assert_calls(0);
        without_auth.assert_calls(1);
    }

    #[tokio::test]
    async fn non_success_uses_detail_then_fallback() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/with-detail");
            then.status(400).json_body(json!({"detail": "Invalid OTP"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/without-detail");
            then.status(502).body("Bad gateway");
        });

        let client = ApiClient::with_base_url(server.base_url()).unwrap();

        let err = client
            .call::<Value, Value>(Method::GET, "/with-detail", "/with-detail", None, "fallback")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 400, ref message } if message == "Invalid OTP"));

        let err = client
            .call::<Value, Value>(Method::GET, "/without-detail", "/without-detail", None, "fallback")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api { status: 502, ref message } if message == "fallback"));
    }

    #[tokio::test]
    async fn transport_failure_is_http_error() {
        // Nothing listens on port 9 locally.
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let err = client
            .call_unit(Method::GET, "/x", "/x", NO_BODY, "fallback")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn bearer_token_follows_session_changes() {
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path());
        let client = ApiClient::with_base_url("http://localhost")
            .unwrap()
            .with_session(session.clone());
        assert_eq!(client.bearer_token(), None);

        session.set_item(crate::session::TOKEN_KEY, "from-session").unwrap();
        assert_eq!(client.bearer_token().as_deref(), Some("from-session"));

        session.clear().unwrap();
        assert_eq!(client.bearer_token(), None);
    }
}
