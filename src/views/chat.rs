//! Chat transcript with optimistic sends.
//!
//! The user's message shows up immediately with a negative local id; the
//! bot reply is appended once the server answers. Only one send may be in
//! flight, which keeps the transcript in insertion order however slow the
//! reply is.

use chrono::Utc;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::{ConversationDetail, Message, Role};
use crate::{Error, Result};

/// Handle for a message appended by [`ChatView::begin_send`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub local_id: i64,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ChatView {
    conversation_id: i64,
    messages: Vec<Message>,
    sending: bool,
    next_local_id: i64,
}

impl ChatView {
    pub fn new(conversation_id: i64) -> Self {
        Self {
            conversation_id,
            messages: Vec::new(),
            sending: false,
            next_local_id: -1,
        }
    }

    pub fn from_detail(detail: ConversationDetail) -> Self {
        let mut view = Self::new(detail.id);
        view.messages = detail.messages;
        view
    }

    pub async fn open(client: &ApiClient, conversation_id: i64) -> Result<Self> {
        Ok(Self::from_detail(client.conversation(conversation_id).await?))
    }

    pub fn conversation_id(&self) -> i64 {
        self.conversation_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Append the user's message locally and mark a send in flight.
    pub fn begin_send(&mut self, input: &str) -> Result<PendingSend> {
        let content = input.trim();
        if content.is_empty() {
            return Err(Error::Validation("Message is empty".to_string()));
        }
        if self.sending {
            return Err(Error::InvalidArgument(
                "A message is already being sent".to_string(),
            ));
        }

        let local_id = self.next_local_id;
        self.next_local_id -= 1;
        self.sending = true;
        self.messages.push(Message {
            id: local_id,
            role: Role::User,
            content: content.to_string(),
            created_at: Utc::now().to_rfc3339(),
        });

        Ok(PendingSend {
            local_id,
            content: content.to_string(),
        })
    }

    /// Finish a send: append the reply on success. On failure the user's
    /// message stays in the transcript.
    pub fn complete_send(&mut self, pending: &PendingSend, reply: Result<Message>) -> Result<()> {
        self.sending = false;
        match reply {
            Ok(message) => {
                self.messages.push(message);
                Ok(())
            }
            Err(e) => {
                warn!(
                    conversation_id = self.conversation_id,
                    local_id = pending.local_id,
                    error = %e,
                    "Message not delivered"
                );
                Err(e)
            }
        }
    }

    pub async fn send(&mut self, client: &ApiClient, input: &str) -> Result<()> {
        let pending = self.begin_send(input)?;
        debug!(conversation_id = self.conversation_id, "Sending message");
        let reply = client
            .send_message(self.conversation_id, &pending.content)
            .await;
        self.complete_send(&pending, reply)
    }

    /// The latest bot message, if any.
    pub fn last_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Bot)
    }
}
