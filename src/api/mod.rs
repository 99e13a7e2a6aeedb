// src/api/mod.rs — Typed wrappers for the ShareTunes backend endpoints

pub mod auth;
pub mod recommendations;
pub mod types;
pub mod users;

use crate::client::ApiClient;

pub use auth::AuthService;
pub use recommendations::RecommendationService;
pub use users::UserService;

/// All endpoint groups over one shared client.
#[derive(Clone)]
pub struct ShareTunesApi {
    pub auth: AuthService,
    pub recommendations: RecommendationService,
    pub users: UserService,
    client: ApiClient,
}

impl ShareTunesApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            recommendations: RecommendationService::new(client.clone()),
            users: UserService::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
