//! League membership endpoints.

use serde_json::{json, Value};

use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::{League, LeagueMember, NewLeague, Standing, WeekPicks};

pub struct LeaguesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn leagues(&self) -> LeaguesApi<'_> {
        LeaguesApi { client: self }
    }
}

impl LeaguesApi<'_> {
    /// Leagues the current user belongs to.
    pub async fn list(&self) -> Result<ApiResponse<Vec<League>>, ApiError> {
        self.client.get("/leagues").await
    }

    pub async fn get(&self, league_id: i64) -> Result<ApiResponse<League>, ApiError> {
        self.client.get(&format!("/leagues/{}", segment(league_id))).await
    }

    pub async fn create(&self, league: &NewLeague) -> Result<ApiResponse<League>, ApiError> {
        self.client.post("/leagues", league).await
    }

    /// Join with an invite code. An unknown code comes back as
    /// `success: false` with a message, not as an error.
    pub async fn join_by_code(&self, code: &str) -> Result<ApiResponse<League>, ApiError> {
        self.client
            .post("/leagues/join", &json!({ "code": code }))
            .await
    }

    pub async fn leave(&self, league_id: i64) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .post_empty(&format!("/leagues/{}/leave", segment(league_id)))
            .await
    }

    pub async fn members(&self, league_id: i64) -> Result<ApiResponse<Vec<LeagueMember>>, ApiError> {
        self.client
            .get(&format!("/leagues/{}/members", segment(league_id)))
            .await
    }

    pub async fn standings(&self, league_id: i64) -> Result<ApiResponse<Vec<Standing>>, ApiError> {
        self.client
            .get(&format!("/leagues/{}/standings", segment(league_id)))
            .await
    }

    /// Every week of picks for one member.
    pub async fn member_picks(
        &self,
        league_id: i64,
        user_id: i64,
    ) -> Result<ApiResponse<Vec<WeekPicks>>, ApiError> {
        self.client
            .get(&format!(
                "/leagues/{}/members/{}/picks",
                segment(league_id),
                segment(user_id)
            ))
            .await
    }
}
