// src/api/types.rs — Transport DTOs for the ShareTunes backend
//
// Fields the backend may omit or send as null fall back to empty values
// instead of failing the whole response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Shown when the backend has no picture for the user.
pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Recommendations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    /// Spotify track id.
    #[serde(rename = "spotify_id", default, deserialize_with = "null_as_default")]
    pub external_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub album: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    /// 30-second preview; many tracks have none.
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl Track {
    /// Preview URL if it is usable (the backend sends "" for none).
    pub fn preview(&self) -> Option<&str> {
        self.preview_url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    #[serde(default)]
    pub context_description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracks: Vec<Track>,
    /// Detail view only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
    /// Detail view only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_response: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a str>,
}

// ─── Auth ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUrl {
    pub auth_url: String,
}

/// Result of asking the backend to refresh its Spotify token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyTokenStatus {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

// ─── Profile ────────────────────────────────────────────────────────────────

/// Profile exactly as the backend serializes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user: Option<AccountInfo>,
    #[serde(default)]
    pub spotify_id: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub external_profile_image_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub favorite_genres: Option<Vec<String>>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_theme", deserialize_with = "theme_or_default")]
    pub theme: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_settings: NotificationSettings,
}

fn default_theme() -> String {
    "light".into()
}

fn theme_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|t| !t.is_empty())
        .unwrap_or_else(default_theme))
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            notification_settings: NotificationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_true")]
    pub push_notifications: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
        }
    }
}

/// Profile as the client shows and edits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub profile_image_url: String,
    pub bio: String,
    pub display_name: String,
    pub favorite_genres: Vec<String>,
    pub preferences: Preferences,
}

impl From<ProfileResponse> for UserProfile {
    fn from(raw: ProfileResponse) -> Self {
        let account = raw.user.unwrap_or_default();
        // profile_image already holds the backend's pick; the raw Spotify
        // URL only fills in when it is empty.
        let profile_image_url = [raw.profile_image, raw.external_profile_image_url]
            .into_iter()
            .flatten()
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());

        Self {
            username: account.username.unwrap_or_default(),
            email: account.email.unwrap_or_default(),
            profile_image_url,
            bio: raw.bio.unwrap_or_default(),
            display_name: raw.display_name.unwrap_or_default(),
            favorite_genres: raw.favorite_genres.unwrap_or_default(),
            preferences: raw.preferences.unwrap_or_default(),
        }
    }
}

impl UserProfile {
    /// Name to greet the user with.
    pub fn greeting_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    pub fn has_custom_picture(&self) -> bool {
        self.profile_image_url != DEFAULT_AVATAR
    }
}

/// Body for `PUT users/profile/`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PictureUploadResponse {
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// `users/genres/` answers either a bare list or `{"genres": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenresPayload {
    List(Vec<String>),
    Wrapped {
        #[serde(default)]
        genres: Vec<String>,
    },
}

impl GenresPayload {
    pub fn into_genres(self) -> Vec<String> {
        match self {
            GenresPayload::List(genres) | GenresPayload::Wrapped { genres } => genres,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenresUpdate<'a> {
    pub genres: &'a [String],
}
