//! Page state kept between requests.
//!
//! The browser pages hold a few lists and flags in component state; these
//! types hold the same state so the CLI (or any other front end) gets the
//! same update rules:
//! - items leave a list only after the server confirmed the delete
//! - chat messages are appended optimistically, the reply after it arrives
//! - the app overview loads its three parts together or not at all

pub mod app_list;
pub mod chat;
pub mod conversations;
pub mod overview;

pub use app_list::AppListView;
pub use chat::{ChatView, PendingSend};
pub use conversations::ConversationListView;
pub use overview::AppOverview;

use std::future::Future;

use chrono::{DateTime, NaiveDateTime};
use tracing::warn;

use crate::models::{App, Conversation};
use crate::Result;

/// Items with a server-side integer id.
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for App {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Conversation {
    fn key(&self) -> i64 {
        self.id
    }
}

/// A list plus its `loading` flag and last error message.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Keyed> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Replace the items with what `fetch` returns. On failure the previous
    /// items stay in place and the error is remembered.
    pub async fn load<F>(&mut self, fetch: F) -> Result<()>
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        self.loading = true;
        let result = fetch.await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load list");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Put an item first, replacing any entry with the same id.
    pub fn upsert_front(&mut self, item: T) {
        self.items.retain(|existing| existing.key() != item.key());
        self.items.insert(0, item);
    }

    /// Run the server delete and drop the item only once it succeeded.
    pub async fn remove_confirmed<F, R>(&mut self, id: i64, delete: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        match delete.await {
            Ok(value) => {
                self.items.retain(|item| item.key() != id);
                self.error = None;
                Ok(value)
            }
            Err(e) => {
                warn!(id, error = %e, "Delete failed, keeping item");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Render a server timestamp as `DD Mon HH:MM`. RFC 3339 and naive ISO
/// timestamps are understood; anything else is shown as is.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d %b %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%d %b %H:%M").to_string();
        }
    }
    raw.to_string()
}

/// [`format_timestamp`] for optional values; missing means never happened.
pub fn format_last_scraped(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.trim().is_empty() => format_timestamp(raw),
        _ => "never".to_string(),
    }
}
