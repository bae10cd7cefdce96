//! Tests for the chat commands

use feedly::commands::chat;
use feedly::models::Role;
use feedly::Error;
use httpmock::prelude::*;
use serde_json::json;

use super::context;

#[tokio::test]
async fn test_send_returns_bot_reply() {
    let server = MockServer::start_async().await;
    let send = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/conversations/3/message")
            .json_body(json!({"content": "Summarize complaints"}));
        then.status(200).json_body(json!({
            "id": 40, "role": "bot", "content": "Mostly login issues.",
            "created_at": "2024-05-02T08:01:00"
        }));
    });
    let (ctx, _dir) = context(&server, true);

    let reply = chat::send(&ctx, 3, "  Summarize complaints ").await.unwrap();
    send.assert();
    assert_eq!(reply.role, Role::Bot);
    assert_eq!(reply.content, "Mostly login issues.");
}

#[tokio::test]
async fn test_blank_message_is_not_sent() {
    let server = MockServer::start_async().await;
    let send = server.mock(|when, then| {
        when.method(POST).path("/chat/conversations/3/message");
        then.status(200);
    });
    let (ctx, _dir) = context(&server, true);

    let err = chat::send(&ctx, 3, "   ").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    send.assert_calls(0);
}

#[tokio::test]
async fn test_new_conversation() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST)
            .path("/chat/conversations")
            .json_body(json!({"app_id": 8}));
        then.status(200).json_body(json!({
            "id": 21, "app_id": 8, "app_name": "Deezer", "app_icon": null,
            "last_message": null, "updated_at": "2024-05-02T08:00:00"
        }));
    });
    let (ctx, _dir) = context(&server, true);

    let conversation = chat::new(&ctx, 8).await.unwrap();
    assert_eq!(conversation.id, 21);
}

#[tokio::test]
async fn test_delete_conversation_failure_propagates() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/chat/conversations");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method(DELETE).path("/chat/conversations/21");
        then.status(500);
    });
    let (ctx, _dir) = context(&server, true);

    let err = chat::delete(&ctx, 21, true).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete conversation");
}
