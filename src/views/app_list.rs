//! The applications page: list, delete, sync.

use tracing::{info, warn};

use super::ListState;
use crate::api::ApiClient;
use crate::models::{AddAppResponse, App};
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct AppListView {
    apps: ListState<App>,
    syncing: Option<i64>,
}

impl AppListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apps(&self) -> &ListState<App> {
        &self.apps
    }

    /// Id of the app currently being re-scraped.
    pub fn syncing(&self) -> Option<i64> {
        self.syncing
    }

    pub async fn load(&mut self, client: &ApiClient) -> Result<()> {
        self.apps.load(client.list_apps()).await
    }

    /// Delete an app after the user confirmed. A declined confirmation
    /// sends nothing and returns `Ok(false)`.
    pub async fn delete<C>(&mut self, client: &ApiClient, id: i64, confirm: C) -> Result<bool>
    where
        C: FnOnce(Option<&App>) -> bool,
    {
        if !confirm(self.apps.get(id)) {
            return Ok(false);
        }
        self.apps.remove_confirmed(id, client.delete_app(id)).await?;
        info!(app_id = id, "🗑️ Application deleted");
        Ok(true)
    }

    /// Re-scrape an app by re-adding its package, then reload the list.
    pub async fn sync(
        &mut self,
        client: &ApiClient,
        id: i64,
        country: &str,
        count: u32,
    ) -> Result<AddAppResponse> {
        let package = self
            .apps
            .get(id)
            .map(|app| app.package_name.clone())
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown application id {}", id)))?;

        self.syncing = Some(id);
        let result = match client.sync_app(&package, country, count).await {
            Ok(response) => self.load(client).await.map(|_| response),
            Err(e) => Err(e),
        };
        self.syncing = None;

        if let Err(ref e) = result {
            warn!(app_id = id, package = %package, error = %e, "Sync failed");
        }
        result
    }
}
