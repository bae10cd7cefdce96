//! Chat endpoints: one conversation per app, messages answered by the bot.

use reqwest::Method;

use super::{ApiClient, NO_BODY};
use crate::models::{Conversation, ConversationDetail, Message, NewConversation, NewMessage};
use crate::Result;

impl ApiClient {
    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        self.call(
            Method::GET,
            "/chat/conversations",
            "/chat/conversations",
            NO_BODY,
            "Failed to load conversations",
        )
        .await
    }

    pub async fn conversation(&self, id: i64) -> Result<ConversationDetail> {
        self.call(
            Method::GET,
            "/chat/conversations/{id}",
            &format!("/chat/conversations/{}", id),
            NO_BODY,
            "Failed to load conversation",
        )
        .await
    }

    pub async fn create_conversation(&self, app_id: i64) -> Result<Conversation> {
        self.call(
            Method::POST,
            "/chat/conversations",
            "/chat/conversations",
            Some(&NewConversation { app_id }),
            "Failed to create conversation",
        )
        .await
    }

    /// Post a user message; the server answers with the bot's reply.
    pub async fn send_message(&self, conversation_id: i64, content: &str) -> Result<Message> {
        let body = NewMessage {
            content: content.to_string(),
        };
        self.call(
            Method::POST,
            "/chat/conversations/{id}/message",
            &format!("/chat/conversations/{}/message", conversation_id),
            Some(&body),
            "Failed to send message",
        )
        .await
    }

    pub async fn delete_conversation(&self, id: i64) -> Result<()> {
        self.call_unit(
            Method::DELETE,
            "/chat/conversations/{id}",
            &format!("/chat/conversations/{}", id),
            NO_BODY,
            "Failed to delete conversation",
        )
        .await
    }
}
