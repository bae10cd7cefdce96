//! Feedly review-monitoring client library
//!
//! This library provides tools to:
//! - Call the Feedly REST API (auth, applications, reviews, chat, AI)
//! - Keep the signed-in session (token, user, cookie) on disk
//! - Decide route-guard redirects for dashboard paths
//! - Label review sentiment scores and tally them
//! - Validate forms before they are submitted
//! - Hold page state: delete-after-confirm lists and optimistic chat
//! - Export review reports as CSV, Markdown or JSON

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod metrics;
pub mod models;
pub mod report;
pub mod route_guard;
pub mod sentiment;
pub mod session;
pub mod views;

// Re-export common types
pub use api::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use route_guard::GuardDecision;
pub use sentiment::{SentimentLabel, SentimentTally};
pub use session::{SessionLock, SessionStore};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;
