//! Tests for the auth commands

use feedly::commands::auth;
use feedly::forms::{LoginForm, ResetPasswordForm};
use feedly::session::TOKEN_KEY;
use feedly::Error;
use httpmock::prelude::*;
use serde_json::json;

use super::context;

#[tokio::test]
async fn test_login_stores_session() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/auth/login");
        then.status(200).json_body(json!({
            "access_token": "fresh-token",
            "token_type": "bearer",
            "user": {"id": 2, "fullname": "Grace", "email": "grace@example.com"}
        }));
    });
    let (ctx, _dir) = context(&server, false);

    let form = LoginForm {
        email: "grace@example.com".into(),
        password: "pw".into(),
    };
    auth::login(&ctx, &form).await.unwrap();

    let session = ctx.client.session().unwrap();
    assert_eq!(session.get_item(TOKEN_KEY).unwrap().as_deref(), Some("fresh-token"));
    assert_eq!(session.get_cookie(TOKEN_KEY).unwrap().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn test_reset_password_mismatch_sends_nothing() {
    let server = MockServer::start_async().await;
    let reset = server.mock(|when, then| {
        when.method(POST).path("/auth/reset-password");
        then.status(200).json_body(json!({"message": "ok"}));
    });
    let (ctx, _dir) = context(&server, false);

    let form = ResetPasswordForm {
        email: "grace@example.com".into(),
        otp: "123456".into(),
        new_password: "one".into(),
        confirm_password: "two".into(),
    };
    let err = auth::reset_password(&ctx, &form).await.unwrap_err();

    assert_eq!(err.to_string(), "Passwords do not match");
    reset.assert_calls(0);
}

#[tokio::test]
async fn test_me_without_session_is_rejected_locally() {
    let server = MockServer::start_async().await;
    let me = server.mock(|when, then| {
        when.method(GET).path("/auth/me");
        then.status(401);
    });
    let (ctx, _dir) = context(&server, false);

    assert!(matches!(auth::me(&ctx).await, Err(Error::NotAuthenticated)));
    me.assert_calls(0);
}

#[tokio::test]
async fn test_delete_account_clears_session() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(DELETE).path("/auth/account");
        then.status(200).json_body(json!({"message": "Account deleted"}));
    });
    let (ctx, _dir) = context(&server, true);

    assert!(auth::delete_account(&ctx, true).await.unwrap());
    assert!(!ctx.client.is_logged_in().unwrap());
}
