//! Direct AI helper calls.

use serde_json::Value;

use super::Context;
use crate::sentiment::SentimentLabel;
use crate::{Error, Result};

pub async fn sentiment(ctx: &Context, text: &str) -> Result<Value> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Validation("Text is required".to_string()));
    }
    let value = ctx.client.analyze_sentiment(text).await?;
    match score_of(&value).and_then(|s| SentimentLabel::from_score(Some(s)).map(|l| (s, l))) {
        Some((score, label)) => println!("{} {} ({:.2})", label.emoji(), label, score),
        None => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(value)
}

pub async fn generate(ctx: &Context, prompt: &str) -> Result<Value> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(Error::Validation("Prompt is required".to_string()));
    }
    let value = ctx.client.generate(prompt).await?;
    match text_of(&value) {
        Some(text) => println!("{}", text),
        None => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(value)
}

/// Numeric score from a bare number or a `score`/`sentiment` field.
fn score_of(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.get("score").and_then(Value::as_f64))
        .or_else(|| value.get("sentiment").and_then(Value::as_f64))
}

fn text_of(value: &Value) -> Option<&str> {
    value.as_str().or_else(|| {
        ["response", "text", "result"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
    })
}
