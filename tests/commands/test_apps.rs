//! Tests for the apps commands

use feedly::commands::apps;
use feedly::forms::AppEditForm;
use feedly::Error;
use httpmock::prelude::*;
use serde_json::json;

use super::context;

#[tokio::test]
async fn test_list_requires_session() {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET).path("/applications");
        then.status(200).json_body(json!([]));
    });
    let (ctx, _dir) = context(&server, false);

    let err = apps::list(&ctx).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
    list.assert_calls(0);
}

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/applications")
            .header("authorization", "Bearer test-token");
        then.status(200).json_body(json!([
            {"id": 1, "package_name": "com.whatsapp", "name": "WhatsApp", "last_scraped": null}
        ]));
    });
    let (ctx, _dir) = context(&server, true);

    let listed = apps::list(&ctx).await.unwrap();
    list.assert();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_add_uses_configured_defaults() {
    let server = MockServer::start_async().await;
    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/add-app")
            .json_body(json!({"app_id": "com.whatsapp", "country": "fr", "count": 200}));
        then.status(200).json_body(json!({
            "status": "success", "message": "Scraping started", "resolved_id": "com.whatsapp"
        }));
    });
    let (ctx, _dir) = context(&server, true);

    let resolved = apps::add(&ctx, "com.whatsapp", None, None).await.unwrap();
    add.assert();
    assert_eq!(resolved, "com.whatsapp");
}

#[tokio::test]
async fn test_add_rejects_foreign_url_before_request() {
    let server = MockServer::start_async().await;
    let add = server.mock(|when, then| {
        when.method(POST).path("/add-app");
        then.status(200);
    });
    let (ctx, _dir) = context(&server, true);

    let err = apps::add(&ctx, "https://example.com/app", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    add.assert_calls(0);
}

#[tokio::test]
async fn test_delete_with_yes_skips_prompt() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/applications");
        then.status(200).json_body(json!([
            {"id": 4, "package_name": "com.spotify.music", "name": "Spotify", "last_scraped": null}
        ]));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/applications/4");
        then.status(200).json_body(json!({"message": "Application deleted"}));
    });
    let (ctx, _dir) = context(&server, true);

    assert!(apps::delete(&ctx, 4, true).await.unwrap());
    delete.assert();
}

#[tokio::test]
async fn test_delete_unknown_id() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/applications");
        then.status(200).json_body(json!([]));
    });
    let (ctx, _dir) = context(&server, true);

    let err = apps::delete(&ctx, 99, true).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn test_update_requires_a_field() {
    let server = MockServer::start_async().await;
    let (ctx, _dir) = context(&server, true);

    let err = apps::update(&ctx, 1, &AppEditForm::default()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_show_fails_when_any_part_fails() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/applications/2");
        then.status(404).json_body(json!({"detail": "Application not found"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/applications/2/analytics");
        then.status(404).json_body(json!({"detail": "Application not found"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/applications/2/comments");
        then.status(200).json_body(json!([]));
    });
    let (ctx, _dir) = context(&server, true);

    let err = apps::show(&ctx, 2, None).await.unwrap_err();
    assert!(err.is_not_found());
}
