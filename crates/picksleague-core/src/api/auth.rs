//! Account endpoints: login, signup, profile, avatar.

use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use super::{ApiClient, ApiError, ApiResponse, FilePart};
use crate::models::{AuthPayload, ProfileUpdate, User};
use crate::storage::StorageError;

/// Multipart field name the avatar endpoint expects.
const AVATAR_FIELD: &str = "avatar";

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Log in and, on success, store the returned credential and user.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthPayload>, ApiError> {
        let body = json!({ "email": email, "password": password });
        let response = self.client.post("/auth/login", &body).await?;
        self.remember_session(&response).await;
        Ok(response)
    }

    /// Create an account and, on success, store the returned credential and user.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<ApiResponse<AuthPayload>, ApiError> {
        let body = json!({ "username": username, "email": email, "password": password });
        let response = self.client.post("/auth/signup", &body).await?;
        self.remember_session(&response).await;
        Ok(response)
    }

    pub async fn me(&self) -> Result<ApiResponse<User>, ApiError> {
        let response = self.client.get("/auth/me").await?;
        self.remember_user(&response).await;
        Ok(response)
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<ApiResponse<User>, ApiError> {
        let response = self.client.put("/auth/profile", update).await?;
        self.remember_user(&response).await;
        Ok(response)
    }

    /// Upload a new avatar image as `multipart/form-data`.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<ApiResponse<User>, ApiError> {
        let request = self
            .client
            .request(Method::POST, "/auth/avatar")
            .file(FilePart {
                field: AVATAR_FIELD.to_string(),
                file_name: file_name.to_string(),
                mime: mime.to_string(),
                bytes,
            });
        let response = self.client.execute(request).await?;
        self.remember_user(&response).await;
        Ok(response)
    }

    /// Forget the stored credential and user. No request is made.
    pub async fn logout(&self) -> Result<(), StorageError> {
        self.client.session().clear().await?;
        info!("Logged out");
        Ok(())
    }

    async fn remember_session(&self, response: &ApiResponse<AuthPayload>) {
        let Some(payload) = response.data().filter(|_| response.success) else {
            return;
        };
        match self.client.session().save(&payload.token, &payload.user).await {
            Ok(()) => info!(user_id = payload.user.id, "Signed in"),
            Err(e) => warn!(error = %e, "Signed in but could not store the session"),
        }
    }

    async fn remember_user(&self, response: &ApiResponse<User>) {
        let Some(user) = response.data().filter(|_| response.success) else {
            return;
        };
        if let Err(e) = self.client.session().set_current_user(user).await {
            warn!(error = %e, "Could not store current user");
        }
    }
}
