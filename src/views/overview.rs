//! Application detail page data.

use tracing::debug;

use crate::api::ApiClient;
use crate::models::{AppAnalytics, AppDetail, Review};
use crate::sentiment::SentimentTally;
use crate::Result;

#[derive(Debug, Clone)]
pub struct AppOverview {
    pub app: AppDetail,
    pub analytics: AppAnalytics,
    pub reviews: Vec<Review>,
}

impl AppOverview {
    /// Fetch app, analytics and reviews concurrently. Any single failure
    /// fails the whole load.
    pub async fn load(client: &ApiClient, id: i64, review_limit: usize) -> Result<Self> {
        let (app, analytics, reviews) = tokio::try_join!(
            client.get_app(id),
            client.analytics(id),
            client.reviews(id, review_limit),
        )?;
        debug!(app_id = id, reviews = reviews.len(), "Overview loaded");
        Ok(Self {
            app,
            analytics,
            reviews,
        })
    }

    /// Sentiment counts over the loaded reviews.
    pub fn review_tally(&self) -> SentimentTally {
        SentimentTally::from_scores(self.reviews.iter().map(|r| r.sentiment))
    }

    /// Share of ratings with `stars`, in whole percent.
    pub fn rating_percent(&self, stars: u8) -> u64 {
        let total = self.analytics.total_rated();
        if total == 0 {
            return 0;
        }
        let count = self
            .analytics
            .rating_distribution
            .get(&stars)
            .copied()
            .unwrap_or(0);
        (count as f64 / total as f64 * 100.0).round() as u64
    }
}
