//! Dashboard overview.

use std::fmt::Write as _;

use super::{truncate, Context};
use crate::models::DashboardStats;
use crate::sentiment::{label_or_na, SentimentLabel};
use crate::views::format_timestamp;
use crate::Result;

pub async fn run(ctx: &Context) -> Result<DashboardStats> {
    ctx.require_page("/dashboard")?;
    let stats = ctx.client.dashboard_stats().await?;
    print!("{}", render(&stats));
    Ok(stats)
}

pub fn render(stats: &DashboardStats) -> String {
    let dist = &stats.sentiment_distribution;
    let mut out = String::new();

    let _ = writeln!(out, "📊 Dashboard\n");
    let _ = writeln!(out, "  Applications:   {}", stats.total_apps);
    let _ = writeln!(out, "  Reviews:        {}", stats.total_reviews);
    let _ = writeln!(out, "  Average rating: {:.1} / 5\n", stats.average_rating);

    for (label, pct, count) in [
        (SentimentLabel::Positive, dist.positive_pct, dist.positive_count),
        (SentimentLabel::Neutral, dist.neutral_pct, dist.neutral_count),
        (SentimentLabel::Negative, dist.negative_pct, dist.negative_count),
    ] {
        let _ = writeln!(
            out,
            "  {} {:<9} {:>5.1}%  ({})",
            label.emoji(),
            label.as_str(),
            pct,
            count
        );
    }

    if stats.recent_activity.is_empty() {
        out.push_str("\nNo recent reviews.\n");
        return out;
    }

    let _ = writeln!(out, "\n🕒 Recent activity");
    for item in &stats.recent_activity {
        let _ = writeln!(
            out,
            "  {}  {:<20} {}★ {:<8} {}",
            format_timestamp(&item.date),
            truncate(&item.app_name, 20),
            item.rating,
            label_or_na(item.sentiment),
            truncate(item.content.as_deref().unwrap_or(""), 60)
        );
    }
    out
}
