// src/api/recommendations.rs

use crate::api::types::{GenerateRequest, Recommendation};
use crate::client::{ApiClient, ApiRequest, Timeout};
use crate::infra::errors::ApiError;

#[derive(Clone)]
pub struct RecommendationService {
    client: ApiClient,
}

impl RecommendationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Past recommendations, newest first. A body that is not a list counts as empty.
    pub async fn list(&self) -> Result<Vec<Recommendation>, ApiError> {
        let body: serde_json::Value = self.client.get_json("recommendations/").await?;
        if !body.is_array() {
            tracing::warn!("recommendation list was not an array, treating as empty");
            return Ok(Vec::new());
        }
        let list: Vec<Recommendation> =
            serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        tracing::debug!(count = list.len(), "fetched recommendations");
        Ok(list)
    }

    pub async fn get(&self, id: i64) -> Result<Recommendation, ApiError> {
        self.client.get_json(&format!("recommendations/{id}/")).await
    }

    /// Generate a new recommendation. Runs on the long-timeout transport.
    pub async fn generate(&self, context: Option<&str>) -> Result<Recommendation, ApiError> {
        let context = context.map(str::trim).filter(|c| !c.is_empty());
        tracing::info!(has_context = context.is_some(), "requesting recommendation");

        let request = ApiRequest::post("recommendations/generate/")
            .with_json(&GenerateRequest { context })?
            .with_timeout(Timeout::Long);
        self.client.execute_json(request).await
    }
}
