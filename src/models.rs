//! JSON view models exchanged with the Feedly API.
//!
//! These mirror what the server sends; the client never creates any of
//! these entities on its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentLabel;

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub fullname: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub fullname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// Applications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: i64,
    pub package_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    pub last_scraped: Option<String>,
}

impl App {
    /// Name shown in lists; falls back to the package name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.package_name)
    }

    /// Two-letter badge used when there is no icon.
    pub fn initials(&self) -> String {
        self.display_name()
            .chars()
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppDetail {
    pub id: i64,
    pub package_name: String,
    pub name: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    pub created_at: String,
    pub last_scraped: Option<String>,
    pub nb_reviews: u64,
}

impl AppDetail {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.package_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppAnalytics {
    pub average_rating: Option<f64>,
    /// Star rating (1..=5) to review count.
    #[serde(default)]
    pub rating_distribution: BTreeMap<u8, u64>,
    pub sentiments: SentimentCounts,
}

impl AppAnalytics {
    pub fn total_rated(&self) -> u64 {
        self.rating_distribution.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub date: String,
    pub rating: u8,
    pub user: Option<String>,
    pub content: Option<String>,
    pub sentiment: Option<f64>,
}

impl Review {
    pub fn sentiment_label(&self) -> Option<SentimentLabel> {
        SentimentLabel::from_score(self.sentiment)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddAppRequest {
    pub app_id: String,
    pub country: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddAppResponse {
    pub status: String,
    pub message: String,
    pub resolved_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
    pub positive_count: u64,
    pub negative_count: u64,
    pub neutral_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: i64,
    pub app_name: String,
    pub app_icon: Option<String>,
    pub rating: u8,
    pub content: Option<String>,
    pub date: String,
    pub sentiment: Option<f64>,
}

impl ActivityItem {
    pub fn sentiment_label(&self) -> Option<SentimentLabel> {
        SentimentLabel::from_score(self.sentiment)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_apps: u64,
    pub total_reviews: u64,
    pub average_rating: f64,
    pub sentiment_distribution: SentimentDistribution,
    #[serde(default)]
    pub recent_activity: Vec<ActivityItem>,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

impl Message {
    /// Messages created locally before the server acknowledged them.
    pub fn is_local(&self) -> bool {
        self.id < 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub app_id: i64,
    pub app_name: Option<String>,
    pub app_icon: Option<String>,
    pub last_message: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDetail {
    pub id: i64,
    pub app_id: i64,
    pub app_name: Option<String>,
    pub app_icon: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewConversation {
    pub app_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub content: String,
}
