//! Statistics endpoints. Payloads are passed through as raw JSON.

use serde_json::Value;

use super::{segment, ApiClient, ApiError, ApiResponse};

pub struct StatsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi { client: self }
    }
}

impl StatsApi<'_> {
    pub async fn driver(&self, driver_id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .get(&format!("/stats/drivers/{}", segment(driver_id)))
            .await
    }

    pub async fn user(&self, league_id: i64, user_id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .get(&format!(
                "/stats/leagues/{}/users/{}",
                segment(league_id),
                segment(user_id)
            ))
            .await
    }

    pub async fn league(&self, league_id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .get(&format!("/stats/leagues/{}", segment(league_id)))
            .await
    }
}
