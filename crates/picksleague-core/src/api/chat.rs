use reqwest::Method;
use serde_json::json;

use super::{segment, ApiClient, ApiError, ApiResponse};
use crate::models::ChatMessage;

pub struct ChatApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi { client: self }
    }
}

impl ChatApi<'_> {
    /// Latest messages, or those older than `before` (a message id).
    pub async fn messages(
        &self,
        league_id: i64,
        before: Option<i64>,
    ) -> Result<ApiResponse<Vec<ChatMessage>>, ApiError> {
        let mut request = self
            .client
            .request(Method::GET, &format!("/chat/{}/messages", segment(league_id)));
        if let Some(before) = before {
            request = request.query("before", before);
        }
        self.client.execute(request).await
    }

    pub async fn send(&self, league_id: i64, text: &str) -> Result<ApiResponse<ChatMessage>, ApiError> {
        self.client
            .post(
                &format!("/chat/{}/messages", segment(league_id)),
                &json!({ "text": text }),
            )
            .await
    }
}
