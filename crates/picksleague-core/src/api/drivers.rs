use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::Driver;

pub struct DriversApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn drivers(&self) -> DriversApi<'_> {
        DriversApi { client: self }
    }
}

impl DriversApi<'_> {
    pub async fn list(&self) -> Result<ApiResponse<Vec<Driver>>, ApiError> {
        self.client.get("/drivers").await
    }

    pub async fn get(&self, driver_id: i64) -> Result<ApiResponse<Driver>, ApiError> {
        self.client.get(&format!("/drivers/{}", segment(driver_id))).await
    }

    /// Drivers the current user may still pick for a week.
    pub async fn available(&self, league_id: i64, week: u32) -> Result<ApiResponse<Vec<Driver>>, ApiError> {
        self.client
            .get(&format!(
                "/drivers/available/{}/{}",
                segment(league_id),
                segment(week)
            ))
            .await
    }
}
