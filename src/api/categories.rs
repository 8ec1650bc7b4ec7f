use reqwest::Method;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{Category, CategoryCreateOrUpdate};

const CATEGORIES_PATH: &str = "/categories";

impl ApiClient {
    /// Predefined categories first, then the user's own.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        let categories: Vec<Category> = self.get_json(self.url(CATEGORIES_PATH)?).await?;
        info!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    pub async fn create_category(
        &self,
        req: &CategoryCreateOrUpdate,
    ) -> Result<Category, ClientError> {
        req.validate()?;
        let category: Category = self.send_json(Method::POST, CATEGORIES_PATH, req).await?;
        info!(id = category.id, name = %category.name, "Created category");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: i64,
        req: &CategoryCreateOrUpdate,
    ) -> Result<Category, ClientError> {
        req.validate()?;
        let path = format!("{CATEGORIES_PATH}/{id}");
        let category: Category = self.send_json(Method::PUT, &path, req).await?;
        info!(id = category.id, name = %category.name, "Renamed category");
        Ok(category)
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &format!("{CATEGORIES_PATH}/{id}"))
            .await?;
        info!(id, "Deleted category");
        Ok(())
    }
}
