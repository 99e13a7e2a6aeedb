// src/api/auth.rs

use crate::api::types::{AuthUrl, ProfileResponse, SpotifyTokenStatus};
use crate::client::ApiClient;
use crate::infra::errors::ApiError;

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Spotify authorization URL to send the user to.
    pub async fn spotify_auth_url(&self) -> Result<String, ApiError> {
        let resp: AuthUrl = self.client.get_json("auth/spotify/login/").await?;
        tracing::debug!("fetched Spotify authorization URL");
        Ok(resp.auth_url)
    }

    /// Profile of the signed-in user; doubles as the "am I signed in" probe.
    pub async fn user_profile(&self) -> Result<ProfileResponse, ApiError> {
        self.client.get_json("auth/profile/").await
    }

    /// Ask the backend to renew its own Spotify token for this user.
    pub async fn refresh_spotify_token(&self) -> Result<SpotifyTokenStatus, ApiError> {
        self.client.get_json("auth/spotify/refresh-token/").await
    }
}
