//! Sentiment thresholding for review scores.
//!
//! The backend attaches a float score in roughly [-1, 1] to every review.
//! Scores strictly above 0.3 are positive, strictly below -0.3 negative,
//! everything in between (bounds included) neutral. Unscored reviews have
//! no label.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const POSITIVE_THRESHOLD: f64 = 0.3;
pub const NEGATIVE_THRESHOLD: f64 = -0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn classify(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn from_score(score: Option<f64>) -> Option<Self> {
        score.filter(|s| !s.is_nan()).map(Self::classify)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "🟢",
            SentimentLabel::Neutral => "⚪",
            SentimentLabel::Negative => "🔴",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an optional score's label, `n/a` when unscored.
pub fn label_or_na(score: Option<f64>) -> &'static str {
    SentimentLabel::from_score(score)
        .map(|l| l.as_str())
        .unwrap_or("n/a")
}

/// Per-label counts over a set of scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub unscored: u64,
}

impl SentimentTally {
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut tally = Self::default();
        for score in scores {
            tally.add(score);
        }
        tally
    }

    pub fn add(&mut self, score: Option<f64>) {
        match SentimentLabel::from_score(score) {
            Some(SentimentLabel::Positive) => self.positive += 1,
            Some(SentimentLabel::Neutral) => self.neutral += 1,
            Some(SentimentLabel::Negative) => self.negative += 1,
            None => self.unscored += 1,
        }
    }

    /// Number of labelled scores.
    pub fn scored(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    /// Share of `label`, in percent, rounded to one decimal.
    pub fn percent(&self, label: SentimentLabel) -> f64 {
        let count = match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        };
        let total = self.scored().max(1) as f64;
        (count as f64 / total * 1000.0).round() / 10.0
    }
}
