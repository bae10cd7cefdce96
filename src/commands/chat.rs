//! Chatbot page commands.

use std::fmt::Write as _;

use super::{confirm, truncate, Context};
use crate::models::{Conversation, Message, Role};
use crate::views::{format_timestamp, ChatView, ConversationListView};
use crate::Result;

const CHAT_PAGE: &str = "/chatbot";

pub async fn list(ctx: &Context) -> Result<Vec<Conversation>> {
    ctx.require_page(CHAT_PAGE)?;
    let mut view = ConversationListView::new();
    view.load(&ctx.client).await?;
    print!("{}", render_conversations(view.conversations().items()));
    Ok(view.conversations().items().to_vec())
}

pub async fn show(ctx: &Context, id: i64) -> Result<()> {
    ctx.require_page(CHAT_PAGE)?;
    let view = ChatView::open(&ctx.client, id).await?;
    print!("{}", render_transcript(view.messages()));
    Ok(())
}

pub async fn new(ctx: &Context, app_id: i64) -> Result<Conversation> {
    ctx.require_page(CHAT_PAGE)?;
    let mut view = ConversationListView::new();
    let conversation = view.start(&ctx.client, app_id).await?;
    println!(
        "💬 Conversation {} started about {}",
        conversation.id,
        conversation.app_name.as_deref().unwrap_or("the application")
    );
    Ok(conversation)
}

/// Send one message and print the reply.
pub async fn send(ctx: &Context, conversation_id: i64, text: &str) -> Result<Message> {
    ctx.require_page(CHAT_PAGE)?;
    let mut view = ChatView::new(conversation_id);
    let pending = view.begin_send(text)?;
    if let Some(sent) = view.messages().last() {
        println!("{}", render_message(sent));
    }

    let reply = ctx
        .client
        .send_message(conversation_id, &pending.content)
        .await;
    view.complete_send(&pending, reply)?;

    let reply = view
        .last_reply()
        .cloned()
        .ok_or_else(|| crate::Error::Http("No reply received".to_string()))?;
    println!("{}", render_message(&reply));
    Ok(reply)
}

pub async fn delete(ctx: &Context, id: i64, assume_yes: bool) -> Result<bool> {
    ctx.require_page(CHAT_PAGE)?;
    if !assume_yes && !confirm(&format!("Delete conversation {}?", id)) {
        println!("Cancelled");
        return Ok(false);
    }
    let mut view = ConversationListView::new();
    view.load(&ctx.client).await?;
    view.delete(&ctx.client, id).await?;
    println!("🗑️ Conversation {} deleted", id);
    Ok(true)
}

pub fn render_conversations(conversations: &[Conversation]) -> String {
    if conversations.is_empty() {
        return "No conversations yet. Start one with `feedly chat new <app-id>`.\n".to_string();
    }
    let mut out = String::new();
    for c in conversations {
        let _ = writeln!(
            out,
            "{:>5}  {:<24} {}  {}",
            c.id,
            truncate(c.app_name.as_deref().unwrap_or("?"), 24),
            format_timestamp(&c.updated_at),
            truncate(c.last_message.as_deref().unwrap_or(""), 60)
        );
    }
    out
}

pub fn render_message(message: &Message) -> String {
    let who = match message.role {
        Role::User => "🧑 you",
        Role::Bot => "🤖 bot",
    };
    format!("[{}] {}: {}", format_timestamp(&message.created_at), who, message.content)
}

pub fn render_transcript(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No messages yet.\n".to_string();
    }
    messages
        .iter()
        .map(|m| render_message(m) + "\n")
        .collect()
}
