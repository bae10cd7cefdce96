//! Conversation sidebar: list, start, delete.

use tracing::info;

use super::ListState;
use crate::api::ApiClient;
use crate::models::Conversation;
use crate::Result;

#[derive(Debug, Default)]
pub struct ConversationListView {
    conversations: ListState<Conversation>,
}

impl ConversationListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &ListState<Conversation> {
        &self.conversations
    }

    pub async fn load(&mut self, client: &ApiClient) -> Result<()> {
        self.conversations.load(client.conversations()).await
    }

    /// Start a conversation about an app; it becomes the first entry.
    pub async fn start(&mut self, client: &ApiClient, app_id: i64) -> Result<Conversation> {
        let conversation = client.create_conversation(app_id).await?;
        info!(conversation_id = conversation.id, app_id, "💬 Conversation started");
        self.conversations.upsert_front(conversation.clone());
        Ok(conversation)
    }

    pub async fn delete(&mut self, client: &ApiClient, id: i64) -> Result<()> {
        self.conversations
            .remove_confirmed(id, client.delete_conversation(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn conversation(id: i64, app_id: i64) -> serde_json::Value {
        json!({
            "id": id, "app_id": app_id, "app_name": "Spotify", "app_icon": null,
            "last_message": null, "updated_at": "2024-05-02T08:00:00"
        })
    }

    #[tokio::test]
    async fn start_puts_new_conversation_first() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/chat/conversations");
            then.status(200).json_body(json!([conversation(1, 4)]));
        });
        server.mock(|when, then| {
            when.method(POST).path("/chat/conversations");
            then.status(200).json_body(conversation(2, 5));
        });

        let client = ApiClient::with_base_url(server.base_url()).unwrap();
        let mut view = ConversationListView::new();
        view.load(&client).await.unwrap();
        view.start(&client, 5).await.unwrap();

        let ids: Vec<i64> = view.conversations().items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn delete_waits_for_server() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/chat/conversations");
            then.status(200)
                .json_body(json!([conversation(1, 4), conversation(2, 5)]));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/chat/conversations/1");
            then.status(200).json_body(json!({"message": "Conversation deleted"}));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/chat/conversations/2");
            then.status(500);
        });

        let client = ApiClient::with_base_url(server.base_url()).unwrap();
        let mut view = ConversationListView::new();
        view.load(&client).await.unwrap();

        view.delete(&client, 1).await.unwrap();
        assert!(view.delete(&client, 2).await.is_err());

        let ids: Vec<i64> = view.conversations().items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
