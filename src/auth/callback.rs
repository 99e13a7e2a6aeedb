// src/auth/callback.rs — OAuth redirect handling
//
// The backend finishes the Spotify authorization-code exchange itself and
// redirects back with `access_token` + `refresh_token`. A redirect that
// still carries a raw `code` is forwarded to the backend's callback.

use url::Url;

use super::{Credentials, Session};
use crate::client::endpoint_url;
use crate::infra::errors::StorageError;

/// Backend endpoint that exchanges an authorization code for tokens.
pub const CODE_EXCHANGE_PATH: &str = "auth/spotify/callback/";

/// Query parameters the redirect target understands. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl CallbackParams {
    /// Parse from a full redirect URL.
    pub fn from_url(redirect: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(redirect)?;
        Ok(Self::from_query(url.query().unwrap_or("")))
    }

    /// Parse from a bare query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.trim_start_matches('?');
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "error" => &mut params.error,
                "access_token" => &mut params.access_token,
                "refresh_token" => &mut params.refresh_token,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Tokens were handed over directly and are now stored.
    LoggedIn,
    /// An authorization code arrived; continue at the backend's exchange URL.
    ExchangeCode { redirect: Url },
    /// The provider reported an error (e.g. `access_denied`).
    Denied(String),
    /// Nothing usable in the redirect.
    MissingParameters,
}

/// Decide what a redirect means and persist tokens when it carries them.
pub fn handle_callback(
    params: &CallbackParams,
    session: &Session,
    base_url: &Url,
) -> Result<CallbackOutcome, StorageError> {
    if let Some(error) = &params.error {
        tracing::warn!(%error, "authorization was not granted");
        return Ok(CallbackOutcome::Denied(error.clone()));
    }

    if let (Some(access), Some(refresh)) = (&params.access_token, &params.refresh_token) {
        session.store_credentials(&Credentials::new(access.as_str(), refresh.as_str()))?;
        tracing::info!("received session tokens from callback");
        return Ok(CallbackOutcome::LoggedIn);
    }

    if let Some(code) = &params.code {
        let mut redirect = endpoint_url(base_url, CODE_EXCHANGE_PATH);
        redirect.query_pairs_mut().append_pair("code", code);
        tracing::debug!("forwarding authorization code to backend");
        return Ok(CallbackOutcome::ExchangeCode { redirect });
    }

    Ok(CallbackOutcome::MissingParameters)
}
