// src/api/users.rs

use crate::api::types::{
    GenresPayload, GenresUpdate, PictureUploadResponse, ProfileResponse, ProfileUpdate,
};
use crate::client::{ApiClient, FilePart};
use crate::infra::errors::ApiError;

/// Multipart field the backend reads the picture from.
pub const PICTURE_FIELD: &str = "image";

#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> Result<ProfileResponse, ApiError> {
        self.client.get_json("users/profile/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError> {
        self.client.put_json("users/profile/", update).await
    }

    /// Upload a new profile picture; returns the URL the backend now serves it under.
    pub async fn update_profile_picture(
        &self,
        file_name: &str,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Option<String>, ApiError> {
        tracing::info!(file_name, size = bytes.len(), "uploading profile picture");
        let part = FilePart {
            field: PICTURE_FIELD.to_string(),
            file_name: file_name.to_string(),
            mime: mime.map(str::to_string),
            bytes,
        };
        let resp: PictureUploadResponse = self
            .client
            .post_multipart("users/profile/picture/", vec![part])
            .await?;
        Ok(resp.profile_image.filter(|url| !url.is_empty()))
    }

    pub async fn favorite_genres(&self) -> Result<Vec<String>, ApiError> {
        let payload: GenresPayload = self.client.get_json("users/genres/").await?;
        Ok(payload.into_genres())
    }

    pub async fn set_favorite_genres(&self, genres: &[String]) -> Result<Vec<String>, ApiError> {
        let payload: GenresPayload = self
            .client
            .post_json("users/genres/", &GenresUpdate { genres })
            .await?;
        Ok(payload.into_genres())
    }
}
