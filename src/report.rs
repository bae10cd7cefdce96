//! Review reports: an app's reviews with sentiment labels, exported as
//! CSV, Markdown or JSON.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::models::{AppAnalytics, AppDetail, Review};
use crate::sentiment::{label_or_na, SentimentLabel, SentimentTally};
use crate::views::{format_timestamp, AppOverview};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Csv,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }

    /// `path` with this format's extension when it has none.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(self.extension())
        }
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(Error::InvalidArgument(format!(
                "Unknown report format '{}' (expected csv, markdown or json)",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReviewRow<'a> {
    date: &'a str,
    rating: u8,
    user: &'a str,
    sentiment: Option<f64>,
    sentiment_label: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Review> for ReviewRow<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            date: &review.date,
            rating: review.rating,
            user: review.user.as_deref().unwrap_or(""),
            sentiment: review.sentiment,
            sentiment_label: label_or_na(review.sentiment),
            content: review.content.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    app_id: i64,
    app_name: &'a str,
    package_name: &'a str,
    average_rating: Option<f64>,
    total_rated: u64,
    sentiment: TallySummary,
    reviews: Vec<ReviewRow<'a>>,
}

#[derive(Debug, Serialize)]
struct TallySummary {
    positive: u64,
    neutral: u64,
    negative: u64,
    unscored: u64,
    positive_pct: f64,
    neutral_pct: f64,
    negative_pct: f64,
}

impl From<SentimentTally> for TallySummary {
    fn from(tally: SentimentTally) -> Self {
        Self {
            positive: tally.positive,
            neutral: tally.neutral,
            negative: tally.negative,
            unscored: tally.unscored,
            positive_pct: tally.percent(SentimentLabel::Positive),
            neutral_pct: tally.percent(SentimentLabel::Neutral),
            negative_pct: tally.percent(SentimentLabel::Negative),
        }
    }
}

/// Borrowed view over one app's loaded data.
#[derive(Debug, Clone)]
pub struct ReviewReport<'a> {
    pub app: &'a AppDetail,
    pub analytics: &'a AppAnalytics,
    pub reviews: &'a [Review],
    pub generated_at: DateTime<Utc>,
}

impl<'a> ReviewReport<'a> {
    pub fn new(app: &'a AppDetail, analytics: &'a AppAnalytics, reviews: &'a [Review]) -> Self {
        Self {
            app,
            analytics,
            reviews,
            generated_at: Utc::now(),
        }
    }

    pub fn from_overview(overview: &'a AppOverview) -> Self {
        Self::new(&overview.app, &overview.analytics, &overview.reviews)
    }

    pub fn tally(&self) -> SentimentTally {
        SentimentTally::from_scores(self.reviews.iter().map(|r| r.sentiment))
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Csv => self.to_csv(),
            ReportFormat::Markdown => Ok(self.to_markdown()),
            ReportFormat::Json => self.to_json(),
        }
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for review in self.reviews {
            writer.serialize(ReviewRow::from(review))?;
        }
        // Header row is only emitted with the first record.
        if self.reviews.is_empty() {
            writer.write_record(["date", "rating", "user", "sentiment", "sentiment_label", "content"])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::SerializationError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| Error::SerializationError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        let report = JsonReport {
            generated_at: self.generated_at.to_rfc3339(),
            app_id: self.app.id,
            app_name: self.app.display_name(),
            package_name: &self.app.package_name,
            average_rating: self.analytics.average_rating,
            total_rated: self.analytics.total_rated(),
            sentiment: self.tally().into(),
            reviews: self.reviews.iter().map(ReviewRow::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn to_markdown(&self) -> String {
        let tally = self.tally();
        let mut out = String::new();

        let _ = writeln!(
            out,
            "# Reviews: {} ({})\n",
            self.app.display_name(),
            self.app.package_name
        );
        let _ = writeln!(
            out,
            "_Generated {}_\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        );

        let average = self
            .analytics
            .average_rating
            .map(|r| format!("{:.1} / 5", r))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(out, "- Average rating: {}", average);
        let _ = writeln!(out, "- Rated reviews: {}", self.analytics.total_rated());
        let _ = writeln!(out, "- Reviews in report: {}", self.reviews.len());
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ] {
            let count = match label {
                SentimentLabel::Positive => tally.positive,
                SentimentLabel::Neutral => tally.neutral,
                SentimentLabel::Negative => tally.negative,
            };
            let _ = writeln!(
                out,
                "- {} {}: {} ({}%)",
                label.emoji(),
                label,
                count,
                tally.percent(label)
            );
        }
        if tally.unscored > 0 {
            let _ = writeln!(out, "- Unscored: {}", tally.unscored);
        }

        out.push_str("\n| Date | Rating | User | Sentiment | Review |\n");
        out.push_str("|---|---|---|---|---|\n");
        for review in self.reviews {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                format_timestamp(&review.date),
                "★".repeat(review.rating.min(5) as usize),
                escape_cell(review.user.as_deref().unwrap_or("")),
                label_or_na(review.sentiment),
                escape_cell(review.content.as_deref().unwrap_or("")),
            );
        }
        out
    }
}

/// Write an already rendered report, returning the path actually written.
pub fn write_report(path: &Path, format: ReportFormat, rendered: &str) -> Result<PathBuf> {
    let path = format.output_path(path);
    std::fs::write(&path, rendered)?;
    info!(path = %path.display(), format = format.extension(), "📁 Report written");
    Ok(path)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
