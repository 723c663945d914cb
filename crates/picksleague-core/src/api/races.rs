use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::{Race, RaceResult};

pub struct RacesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn races(&self) -> RacesApi<'_> {
        RacesApi { client: self }
    }
}

impl RacesApi<'_> {
    pub async fn schedule(&self) -> Result<ApiResponse<Vec<Race>>, ApiError> {
        self.client.get("/races").await
    }

    /// The race whose picks are currently open, if any.
    pub async fn current(&self) -> Result<ApiResponse<Race>, ApiError> {
        self.client.get("/races/current").await
    }

    pub async fn results(&self, week: u32) -> Result<ApiResponse<Vec<RaceResult>>, ApiError> {
        self.client
            .get(&format!("/races/{}/results", segment(week)))
            .await
    }
}
