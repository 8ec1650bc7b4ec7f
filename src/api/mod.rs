pub mod auth;
pub mod categories;
pub mod items;

use tracing::info;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::HealthResponse;

impl ApiClient {
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let health: HealthResponse = self.get_json(self.url("/health")?).await?;
        info!(status = %health.status, "Checked API health");
        Ok(health)
    }
}
