//! `feedly report`: export an app's reviews.

use std::path::Path;

use super::Context;
use crate::report::{write_report, ReportFormat, ReviewReport};
use crate::views::AppOverview;
use crate::Result;

pub async fn run(
    ctx: &Context,
    app_id: i64,
    format: ReportFormat,
    output: Option<&Path>,
    limit: Option<usize>,
) -> Result<String> {
    ctx.require_page("/reports")?;
    let limit = limit.unwrap_or(ctx.config.review_limit);
    let overview = AppOverview::load(&ctx.client, app_id, limit).await?;
    let report = ReviewReport::from_overview(&overview);

    let rendered = report.render(format)?;
    match output {
        Some(path) => {
            let path = write_report(path, format, &rendered)?;
            println!(
                "📁 {} reviews of {} exported to {}",
                overview.reviews.len(),
                overview.app.display_name(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(rendered)
}
