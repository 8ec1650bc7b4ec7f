use reqwest::Method;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{
    ItemQuery, PaginatedResponse, TrackingItem, TrackingItemCreate, TrackingItemRecreate,
    TrackingItemUpdate,
};

const ITEMS_PATH: &str = "/tracking-items";

fn item_path(id: i64) -> String {
    format!("{ITEMS_PATH}/{id}")
}

impl ApiClient {
    pub async fn list_items(
        &self,
        query: &ItemQuery,
    ) -> Result<PaginatedResponse<TrackingItem>, ClientError> {
        let url = self.url_with_query(ITEMS_PATH, &query.to_pairs())?;
        let page: PaginatedResponse<TrackingItem> = self.get_json(url).await?;
        page.check_page_size()?;

        if page.computed_pages() != page.pages {
            debug!(
                pages = page.pages,
                computed = page.computed_pages(),
                "Server page count differs from total/page_size"
            );
        }

        info!(
            count = page.items.len(),
            page = page.page,
            pages = page.pages,
            "Listed tracking items"
        );
        Ok(page)
    }

    pub async fn get_item(&self, id: i64) -> Result<TrackingItem, ClientError> {
        self.get_json(self.url(&item_path(id))?).await
    }

    pub async fn create_item(&self, req: &TrackingItemCreate) -> Result<TrackingItem, ClientError> {
        req.validate()?;
        let item: TrackingItem = self.send_json(Method::POST, ITEMS_PATH, req).await?;
        info!(id = item.id, title = %item.title, "Created tracking item");
        Ok(item)
    }

    pub async fn update_item(
        &self,
        id: i64,
        req: &TrackingItemUpdate,
    ) -> Result<TrackingItem, ClientError> {
        req.validate()?;
        let item: TrackingItem = self.send_json(Method::PUT, &item_path(id), req).await?;
        info!(id = item.id, "Updated tracking item");
        Ok(item)
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &item_path(id)).await?;
        info!(id, "Deleted tracking item");
        Ok(())
    }

    pub async fn mark_done(&self, id: i64) -> Result<TrackingItem, ClientError> {
        let path = format!("{}/done", item_path(id));
        let item: TrackingItem = self.send_json(Method::PUT, &path, &serde_json::json!({})).await?;
        info!(id = item.id, is_done = item.is_done, "Marked tracking item done");
        Ok(item)
    }

    /// Re-arms a finished reminder with a new date.
    pub async fn recreate_item(
        &self,
        id: i64,
        req: &TrackingItemRecreate,
    ) -> Result<TrackingItem, ClientError> {
        req.validate()?;
        let path = format!("{}/recreate", item_path(id));
        let item: TrackingItem = self.send_json(Method::POST, &path, req).await?;
        info!(id = item.id, reminder_date = %item.reminder_date, "Recreated tracking item");
        Ok(item)
    }
}
