use reqwest::Method;

use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::{ActivityItem, Page};

pub struct ActivityApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn activity(&self) -> ActivityApi<'_> {
        ActivityApi { client: self }
    }
}

impl ActivityApi<'_> {
    pub async fn feed(&self, league_id: i64, page: &Page) -> Result<ApiResponse<Vec<ActivityItem>>, ApiError> {
        let request = self
            .client
            .request(Method::GET, &format!("/activity/{}", segment(league_id)))
            .query("limit", page.limit)
            .query("offset", page.offset);
        self.client.execute(request).await
    }
}
