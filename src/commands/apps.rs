//! Application commands: the apps page, the add form and the detail page.

use std::fmt::Write as _;

use super::{confirm, truncate, Context};
use crate::forms::{package_from_input, AddAppForm, AppEditForm};
use crate::models::{App, AppAnalytics, Review};
use crate::sentiment::{label_or_na, SentimentLabel};
use crate::views::{format_last_scraped, format_timestamp, AppListView, AppOverview};
use crate::{Error, Result};

const APPS_PAGE: &str = "/apps";

pub async fn list(ctx: &Context) -> Result<Vec<App>> {
    ctx.require_page(APPS_PAGE)?;
    let mut view = AppListView::new();
    view.load(&ctx.client).await?;
    print!("{}", render_app_table(view.apps().items()));
    Ok(view.apps().items().to_vec())
}

pub async fn show(ctx: &Context, id: i64, review_limit: Option<usize>) -> Result<AppOverview> {
    ctx.require_page(&format!("{}/{}", APPS_PAGE, id))?;
    let limit = review_limit.unwrap_or(ctx.config.review_limit);
    let overview = AppOverview::load(&ctx.client, id, limit).await?;
    print!("{}", render_overview(&overview, 10));
    Ok(overview)
}

pub async fn add(ctx: &Context, input: &str, country: Option<&str>, count: Option<u32>) -> Result<String> {
    ctx.require_page("/apps/new")?;
    let form = AddAppForm::new(
        input,
        country.unwrap_or(&ctx.config.default_country),
        count.unwrap_or(ctx.config.default_count),
    );
    let request = form.validate()?;
    if let Some(package) = package_from_input(&request.app_id) {
        println!("📦 Package: {}", package);
    }
    let response = ctx.client.add_app(&request).await?;
    println!("✅ {} ({})", response.message, response.resolved_id);
    Ok(response.resolved_id)
}

pub async fn update(ctx: &Context, id: i64, form: &AppEditForm) -> Result<()> {
    ctx.require_page(APPS_PAGE)?;
    let update = form.validate()?;
    let response = ctx.client.update_app(id, &update).await?;
    if response.message.is_empty() {
        println!("✅ Application updated");
    } else {
        println!("✅ {}", response.message);
    }
    Ok(())
}

/// Returns whether the app was deleted.
pub async fn delete(ctx: &Context, id: i64, assume_yes: bool) -> Result<bool> {
    ctx.require_page(APPS_PAGE)?;
    let mut view = AppListView::new();
    view.load(&ctx.client).await?;
    if !view.apps().contains(id) {
        return Err(Error::InvalidArgument(format!("Unknown application id {}", id)));
    }

    let deleted = view
        .delete(&ctx.client, id, |app| {
            assume_yes
                || confirm(&format!(
                    "Delete {} and all its reviews?",
                    app.map(App::display_name).unwrap_or("this application")
                ))
        })
        .await?;

    if deleted {
        println!("🗑️ Application {} deleted", id);
    } else {
        println!("Cancelled");
    }
    Ok(deleted)
}

pub async fn sync(ctx: &Context, id: i64) -> Result<()> {
    ctx.require_page(APPS_PAGE)?;
    let mut view = AppListView::new();
    view.load(&ctx.client).await?;
    println!("🔄 Syncing application {}...", id);
    let response = view
        .sync(
            &ctx.client,
            id,
            &ctx.config.default_country,
            ctx.config.default_count,
        )
        .await?;
    println!("✅ {}", response.message);
    print!("{}", render_app_table(view.apps().items()));
    Ok(())
}

pub async fn reviews(ctx: &Context, id: i64, limit: Option<usize>) -> Result<Vec<Review>> {
    ctx.require_page(&format!("{}/{}", APPS_PAGE, id))?;
    let limit = limit.unwrap_or(ctx.config.review_limit);
    let reviews = ctx.client.reviews(id, limit).await?;
    print!("{}", render_reviews(&reviews, reviews.len()));
    Ok(reviews)
}

pub async fn analytics(ctx: &Context, id: i64) -> Result<AppAnalytics> {
    ctx.require_page(&format!("{}/{}", APPS_PAGE, id))?;
    let analytics = ctx.client.analytics(id).await?;
    print!("{}", render_analytics(&analytics));
    Ok(analytics)
}

pub fn render_app_table(apps: &[App]) -> String {
    if apps.is_empty() {
        return "No applications yet. Add one with `feedly apps add <name|package|url>`.\n"
            .to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "📱 Applications ({})\n", apps.len());
    let _ = writeln!(out, "{:>5}  {:<4} {:<28} {:<32} Last sync", "ID", "", "Name", "Package");
    for app in apps {
        let _ = writeln!(
            out,
            "{:>5}  {:<4} {:<28} {:<32} {}",
            app.id,
            app.initials(),
            truncate(app.display_name(), 28),
            truncate(&app.package_name, 32),
            format_last_scraped(app.last_scraped.as_deref())
        );
    }
    out
}

pub fn render_analytics(analytics: &AppAnalytics) -> String {
    let mut out = String::new();
    let average = analytics
        .average_rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "n/a".to_string());
    let total = analytics.total_rated();
    let _ = writeln!(out, "⭐ Average rating: {} ({} ratings)", average, total);

    for stars in (1..=5u8).rev() {
        let count = analytics.rating_distribution.get(&stars).copied().unwrap_or(0);
        let width = if total == 0 { 0 } else { (count * 20 / total) as usize };
        let _ = writeln!(out, "  {}★ {:<20} {}", stars, "█".repeat(width), count);
    }

    let s = &analytics.sentiments;
    let _ = writeln!(
        out,
        "{} positive {}  {} neutral {}  {} negative {}",
        SentimentLabel::Positive.emoji(),
        s.positive,
        SentimentLabel::Neutral.emoji(),
        s.neutral,
        SentimentLabel::Negative.emoji(),
        s.negative
    );
    out
}

pub fn render_reviews(reviews: &[Review], max: usize) -> String {
    if reviews.is_empty() {
        return "No reviews yet.\n".to_string();
    }
    let mut out = String::new();
    for review in reviews.iter().take(max) {
        let _ = writeln!(
            out,
            "{}  {:<5} {:<8} {:<16} {}",
            format_timestamp(&review.date),
            "★".repeat(review.rating.min(5) as usize),
            label_or_na(review.sentiment),
            truncate(review.user.as_deref().unwrap_or("anonymous"), 16),
            truncate(review.content.as_deref().unwrap_or(""), 80)
        );
    }
    out
}

pub fn render_overview(overview: &AppOverview, max_reviews: usize) -> String {
    let app = &overview.app;
    let mut out = String::new();
    let _ = writeln!(out, "📱 {} ({})", app.display_name(), app.package_name);
    let _ = writeln!(
        out,
        "   {} reviews · added {} · last sync {}\n",
        app.nb_reviews,
        format_timestamp(&app.created_at),
        format_last_scraped(app.last_scraped.as_deref())
    );
    out.push_str(&render_analytics(&overview.analytics));

    let tally = overview.review_tally();
    let _ = writeln!(
        out,
        "\nLatest {} reviews: {}% positive, {}% negative\n",
        overview.reviews.len(),
        tally.percent(SentimentLabel::Positive),
        tally.percent(SentimentLabel::Negative)
    );
    out.push_str(&render_reviews(&overview.reviews, max_reviews));
    out
}
