//! Direct calls to the server's AI helpers. Response shapes are not fixed,
//! so they come back as raw JSON.

use reqwest::Method;
use serde_json::{json, Value};

use super::ApiClient;
use crate::Result;

impl ApiClient {
    pub async fn analyze_sentiment(&self, text: &str) -> Result<Value> {
        let body = json!({ "text": text });
        self.call(
            Method::POST,
            "/ai/sentiment",
            "/ai/sentiment",
            Some(&body),
            "Sentiment analysis failed",
        )
        .await
    }

    pub async fn generate(&self, prompt: &str) -> Result<Value> {
        let body = json!({ "prompt": prompt });
        self.call(
            Method::POST,
            "/ai/generate",
            "/ai/generate",
            Some(&body),
            "Generation failed",
        )
        .await
    }
}
