//! Push notification registration and preferences.

use serde_json::{json, Value};

use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::{DevicePlatform, NotificationPreferences};

pub struct NotificationsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi { client: self }
    }
}

impl NotificationsApi<'_> {
    pub async fn register_device(
        &self,
        push_token: &str,
        platform: DevicePlatform,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .post(
                "/notifications/devices",
                &json!({ "pushToken": push_token, "platform": platform }),
            )
            .await
    }

    pub async fn unregister_device(&self, push_token: &str) -> Result<ApiResponse<Value>, ApiError> {
        self.client
            .delete(&format!("/notifications/devices/{}", segment(push_token)))
            .await
    }

    pub async fn preferences(&self) -> Result<ApiResponse<NotificationPreferences>, ApiError> {
        self.client.get("/notifications/preferences").await
    }

    pub async fn update_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> Result<ApiResponse<NotificationPreferences>, ApiError> {
        self.client
            .put("/notifications/preferences", preferences)
            .await
    }
}
