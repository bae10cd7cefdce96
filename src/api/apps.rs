//! Application, review and analytics endpoints.

use reqwest::Method;
use tracing::info;

use super::{ApiClient, NO_BODY};
use crate::models::{
    AddAppRequest, AddAppResponse, App, AppAnalytics, AppDetail, AppUpdate, DashboardStats,
    MessageResponse, Review,
};
use crate::Result;

impl ApiClient {
    pub async fn list_apps(&self) -> Result<Vec<App>> {
        self.call(
            Method::GET,
            "/applications",
            "/applications",
            NO_BODY,
            "Failed to load applications",
        )
        .await
    }

    pub async fn get_app(&self, id: i64) -> Result<AppDetail> {
        self.call(
            Method::GET,
            "/applications/{id}",
            &format!("/applications/{}", id),
            NO_BODY,
            "Failed to load application",
        )
        .await
    }

    /// Register an app and trigger the server-side scrape. The server
    /// resolves free-text names to a package id.
    pub async fn add_app(&self, data: &AddAppRequest) -> Result<AddAppResponse> {
        let response: AddAppResponse = self
            .call(
                Method::POST,
                "/add-app",
                "/add-app",
                Some(data),
                "Failed to add application",
            )
            .await?;
        info!(
            input = %data.app_id,
            resolved_id = %response.resolved_id,
            status = %response.status,
            "📥 Application added"
        );
        Ok(response)
    }

    /// Re-scrape an already tracked app by submitting its package again.
    pub async fn sync_app(&self, package_name: &str, country: &str, count: u32) -> Result<AddAppResponse> {
        self.add_app(&AddAppRequest {
            app_id: package_name.to_string(),
            country: country.to_string(),
            count,
        })
        .await
    }

    pub async fn update_app(&self, id: i64, data: &AppUpdate) -> Result<MessageResponse> {
        self.call(
            Method::PUT,
            "/applications/{id}",
            &format!("/applications/{}", id),
            Some(data),
            "Failed to update application",
        )
        .await
    }

    pub async fn delete_app(&self, id: i64) -> Result<()> {
        self.call_unit(
            Method::DELETE,
            "/applications/{id}",
            &format!("/applications/{}", id),
            NO_BODY,
            "Failed to delete application",
        )
        .await
    }

    /// Most recent reviews first, at most `limit` of them.
    pub async fn reviews(&self, id: i64, limit: usize) -> Result<Vec<Review>> {
        self.call(
            Method::GET,
            "/applications/{id}/comments",
            &format!("/applications/{}/comments?limit={}", id, limit),
            NO_BODY,
            "Failed to load reviews",
        )
        .await
    }

    pub async fn analytics(&self, id: i64) -> Result<AppAnalytics> {
        self.call(
            Method::GET,
            "/applications/{id}/analytics",
            &format!("/applications/{}/analytics", id),
            NO_BODY,
            "Failed to load analytics",
        )
        .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.call(
            Method::GET,
            "/dashboard/stats",
            "/dashboard/stats",
            NO_BODY,
            "Failed to load dashboard stats",
        )
        .await
    }
}
