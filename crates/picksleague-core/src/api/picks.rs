//! Weekly driver picks.
//!
//! Identifiers are interpolated in the order league, week, then user or
//! pick position.

use serde_json::{json, Value};

use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::{Pick, WeekPicks};

pub struct PicksApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn picks(&self) -> PicksApi<'_> {
        PicksApi { client: self }
    }
}

impl PicksApi<'_> {
    /// The current user's picks for a week.
    pub async fn for_week(&self, league_id: i64, week: u32) -> Result<ApiResponse<WeekPicks>, ApiError> {
        self.client
            .get(&format!("/picks/{}/week/{}", segment(league_id), segment(week)))
            .await
    }

    /// Another member's picks for a week.
    pub async fn for_user(
        &self,
        league_id: i64,
        week: u32,
        user_id: i64,
    ) -> Result<ApiResponse<WeekPicks>, ApiError> {
        self.client
            .get(&format!(
                "/picks/{}/week/{}/user/{}",
                segment(league_id),
                segment(week),
                segment(user_id)
            ))
            .await
    }

    pub async fn submit(
        &self,
        league_id: i64,
        week: u32,
        position: u32,
        driver_id: i64,
    ) -> Result<ApiResponse<Pick>, ApiError> {
        self.client
            .put(
                &format!(
                    "/picks/{}/week/{}/{}",
                    segment(league_id),
                    segment(week),
                    segment(position)
                ),
                &json!({ "driverId": driver_id }),
            )
            .await
    }

    pub async fn clear(&self, league_id: i64, week: u32, position: u32) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .delete(&format!(
                "/picks/{}/week/{}/{}",
                segment(league_id),
                segment(week),
                segment(position)
            ))
            .await
    }
}
