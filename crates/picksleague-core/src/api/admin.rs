//! League administration. The server enforces who may call these.

use serde_json::Value;

use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::League;

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi { client: self }
    }
}

impl AdminApi<'_> {
    pub async fn lock_week(&self, league_id: i64, week: u32) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .post_empty(&format!(
                "/admin/leagues/{}/weeks/{}/lock",
                segment(league_id),
                segment(week)
            ))
            .await
    }

    pub async fn remove_member(&self, league_id: i64, user_id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .delete(&format!(
                "/admin/leagues/{}/members/{}",
                segment(league_id),
                segment(user_id)
            ))
            .await
    }

    pub async fn regenerate_invite_code(&self, league_id: i64) -> Result<ApiResponse<League>, ApiError> {
        self.client
            .post_empty(&format!("/admin/leagues/{}/invite-code", segment(league_id)))
            .await
    }

    /// Ask the server to pull official results for a race week.
    pub async fn sync_results(&self, week: u32) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .post_empty(&format!("/admin/races/{}/sync", segment(week)))
            .await
    }
}
