// src/app/dashboard.rs — In-memory state behind the dashboard screen
//
// Loads the signed-in user's profile and past recommendations, and
// prepends freshly generated ones. Nothing here is persisted.

use crate::api::types::{Recommendation, UserProfile};
use crate::api::ShareTunesApi;
use crate::auth::Session;
use crate::infra::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    /// No usable session; the caller should send the user to sign in.
    NotAuthenticated,
}

pub struct Dashboard {
    api: ShareTunesApi,
    profile: Option<UserProfile>,
    recommendations: Vec<Recommendation>,
    /// Free-text mood/situation sent with the next generate call.
    pub context: String,
    loading: bool,
    generating: bool,
}

impl Dashboard {
    pub fn new(api: ShareTunesApi) -> Self {
        Self {
            api,
            profile: None,
            recommendations: Vec::new(),
            context: String::new(),
            loading: false,
            generating: false,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Fetch profile and history.
    ///
    /// A failed profile fetch means the session is unusable: tokens are
    /// dropped. A failed history fetch only leaves the list empty.
    pub async fn load(&mut self) -> LoadOutcome {
        let session = self.api.client().session().clone();
        if !session.is_authenticated() {
            return LoadOutcome::NotAuthenticated;
        }

        self.loading = true;
        let outcome = self.load_inner(&session).await;
        self.loading = false;
        outcome
    }

    async fn load_inner(&mut self, session: &Session) -> LoadOutcome {
        match self.api.auth.user_profile().await {
            Ok(raw) => self.profile = Some(raw.into()),
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch failed, signing out");
                if let Err(e) = session.clear() {
                    tracing::warn!(error = %e, "failed to clear stored tokens");
                }
                self.profile = None;
                return LoadOutcome::NotAuthenticated;
            }
        }

        match self.api.recommendations.list().await {
            Ok(list) => self.recommendations = list,
            Err(e) => tracing::warn!(error = %e, "could not load past recommendations"),
        }

        LoadOutcome::Ready
    }

    /// Generate from the current `context`. On success the result goes to
    /// the top of the list and the context is cleared; on failure the list
    /// and context are left as they were.
    pub async fn generate(&mut self) -> Result<&Recommendation, ApiError> {
        self.generating = true;
        let context = self.context.clone();
        let result = self
            .api
            .recommendations
            .generate(Some(context.as_str()))
            .await;
        self.generating = false;

        let recommendation = result?;
        self.recommendations.insert(0, recommendation);
        self.context.clear();
        Ok(&self.recommendations[0])
    }
}
