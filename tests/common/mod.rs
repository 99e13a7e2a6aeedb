// tests/common/mod.rs — In-process mock of the ShareTunes backend
//
// Protected routes accept exactly one bearer token (`accepted_token`) and
// answer 401 otherwise, the way the JWT-protected backend does.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sharetunes::auth::{Credentials, MemoryTokenStore, Session};
use sharetunes::client::ApiClient;
use sharetunes::infra::config::ApiConfig;

#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    /// Answer `{"access": access}`; when `accept` the new token becomes valid.
    Issue { access: String, accept: bool },
    /// Issue and accept `access`, rotating the refresh token too.
    Rotate { access: String, refresh: String },
    Reject(StatusCode),
    /// 200 without an `access` field.
    NoAccess,
}

#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

pub struct Backend {
    pub accepted_token: Mutex<Option<String>>,
    pub refresh: Mutex<RefreshBehavior>,
    pub refresh_delay: Mutex<Duration>,
    pub refresh_bodies: Mutex<Vec<Value>>,
    pub hits: Mutex<Vec<Hit>>,
    pub list_response: Mutex<(StatusCode, Value)>,
    pub profile_response: Mutex<(StatusCode, Value)>,
    pub generate_status: Mutex<StatusCode>,
    pub generate_delay: Mutex<Duration>,
    pub generate_bodies: Mutex<Vec<Value>>,
    pub profile_updates: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<Upload>>,
    pub genres: Mutex<Vec<String>>,
}

impl Backend {
    /// Accepts `token`; refresh issues `A2` and accepts it.
    pub fn accepting(token: &str) -> Arc<Self> {
        Arc::new(Self {
            accepted_token: Mutex::new(Some(token.to_string())),
            refresh: Mutex::new(RefreshBehavior::Issue {
                access: "A2".into(),
                accept: true,
            }),
            refresh_delay: Mutex::new(Duration::ZERO),
            refresh_bodies: Mutex::new(Vec::new()),
            hits: Mutex::new(Vec::new()),
            list_response: Mutex::new((
                StatusCode::OK,
                json!([recommendation_json(2, Some("night drive")), recommendation_json(1, None)]),
            )),
            profile_response: Mutex::new((StatusCode::OK, profile_json())),
            generate_status: Mutex::new(StatusCode::OK),
            generate_delay: Mutex::new(Duration::ZERO),
            generate_bodies: Mutex::new(Vec::new()),
            profile_updates: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            genres: Mutex::new(vec!["jazz".into()]),
        })
    }

    pub fn set_refresh(&self, behavior: RefreshBehavior) {
        *self.refresh.lock().unwrap() = behavior;
    }

    pub fn hits_for(&self, path: &str) -> Vec<Hit> {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.path == path)
            .cloned()
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.hits_for("/api/auth/token/refresh/").len()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let accepted = self.accepted_token.lock().unwrap().clone();
        match (presented, accepted) {
            (Some(p), Some(a)) if p == a => Ok(()),
            _ => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "detail": "Given token not valid for any token type",
                    "code": "token_not_valid"
                })),
            )
                .into_response()),
        }
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────────────

pub fn recommendation_json(id: i64, context: Option<&str>) -> Value {
    json!({
        "id": id,
        "context_description": context,
        "created_at": "2025-04-17T09:30:00Z",
        "tracks": [
            {
                "id": id * 10,
                "spotify_id": "4vLYewWIvqHfKtJDk8c8tq",
                "name": "So What",
                "artist": "Miles Davis",
                "album": "Kind of Blue",
                "image_url": "https://i.scdn.co/image/kob",
                "preview_url": null,
                "explanation": "Unhurried modal jazz.",
                "position": 0
            }
        ]
    })
}

pub fn profile_json() -> Value {
    json!({
        "id": 1,
        "user": {"id": 5, "username": "miho", "email": "miho@example.com",
                 "first_name": "", "last_name": ""},
        "spotify_id": "miho_sp",
        "profile_image": "https://i.scdn.co/image/miho",
        "external_profile_image_url": "https://i.scdn.co/image/miho",
        "bio": "",
        "display_name": "Miho",
        "favorite_genres": ["jazz", "city pop"],
        "preferences": {"theme": "dark"}
    })
}

// ─── Handlers ───────────────────────────────────────────────────────────────

async fn record(State(backend): State<Arc<Backend>>, request: Request, next: Next) -> Response {
    let hit = Hit {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    backend.hits.lock().unwrap().push(hit);
    next.run(request).await
}

async fn auth_url() -> Json<Value> {
    Json(json!({"auth_url": "https://accounts.spotify.com/authorize?client_id=test"}))
}

async fn refresh(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.refresh_bodies.lock().unwrap().push(body);
    let delay = *backend.refresh_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let behavior = backend.refresh.lock().unwrap().clone();
    match behavior {
        RefreshBehavior::Issue { access, accept } => {
            if accept {
                *backend.accepted_token.lock().unwrap() = Some(access.clone());
            }
            Json(json!({"access": access})).into_response()
        }
        RefreshBehavior::Rotate { access, refresh } => {
            *backend.accepted_token.lock().unwrap() = Some(access.clone());
            Json(json!({"access": access, "refresh": refresh})).into_response()
        }
        RefreshBehavior::Reject(status) => (
            status,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response(),
        RefreshBehavior::NoAccess => Json(json!({"detail": "ok"})).into_response(),
    }
}

async fn auth_profile(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let (status, body) = backend.profile_response.lock().unwrap().clone();
    (status, Json(body)).into_response()
}

async fn spotify_refresh(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    Json(json!({"message": "Token still valid", "expires_at": "2025-04-17T10:00:00Z"}))
        .into_response()
}

async fn list_recommendations(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let (status, body) = backend.list_response.lock().unwrap().clone();
    (status, Json(body)).into_response()
}

async fn get_recommendation(
    State(backend): State<Arc<Backend>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    let mut body = recommendation_json(id, Some("detail"));
    body["prompt_text"] = json!("prompt for detail");
    body["llm_response"] = json!("[]");
    Json(body).into_response()
}

async fn generate(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    backend.generate_bodies.lock().unwrap().push(body.clone());
    let delay = *backend.generate_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let status = *backend.generate_status.lock().unwrap();
    if !status.is_success() {
        return (status, Json(json!({"error": "LLM unavailable"}))).into_response();
    }
    let context = body.get("context").and_then(Value::as_str);
    Json(recommendation_json(99, context)).into_response()
}

async fn get_user_profile(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    auth_profile(State(backend), headers).await
}

async fn put_user_profile(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(update): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    backend.profile_updates.lock().unwrap().push(update.clone());

    let mut profile = backend.profile_response.lock().unwrap().1.clone();
    if let Value::Object(fields) = update {
        for (key, value) in fields {
            match key.as_str() {
                "username" | "email" | "first_name" | "last_name" => {
                    profile["user"][key.as_str()] = value
                }
                _ => profile[key.as_str()] = value,
            }
        }
    }
    backend.profile_response.lock().unwrap().1 = profile.clone();
    Json(profile).into_response()
}

async fn upload_picture(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let mut stored = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        if name == "image" {
            stored = file_name.clone();
        }
        backend.uploads.lock().unwrap().push(Upload {
            field: name,
            file_name,
            content_type,
            size,
        });
    }
    match stored {
        Some(file) => Json(json!({
            "profile_image": format!("http://backend:8000/media/profile_images/{file}")
        }))
        .into_response(),
        None => (StatusCode::BAD_REQUEST, Json(json!({"error": "no image"}))).into_response(),
    }
}

async fn get_genres(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let genres = backend.genres.lock().unwrap().clone();
    Json(json!({"genres": genres})).into_response()
}

async fn set_genres(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let genres: Vec<String> = serde_json::from_value(body["genres"].clone()).unwrap_or_default();
    *backend.genres.lock().unwrap() = genres.clone();
    // This endpoint answers with a bare list.
    Json(json!(genres)).into_response()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    Json(json!({}))
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))).into_response()
}

async fn content_type_echo(headers: HeaderMap) -> Json<Value> {
    let accept = headers.get("accept").and_then(|v| v.to_str().ok());
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    Json(json!({"accept": accept, "content_type": content_type}))
}

pub fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/api/auth/spotify/login/", get(auth_url))
        .route("/api/auth/token/refresh/", post(refresh))
        .route("/api/auth/profile/", get(auth_profile))
        .route("/api/auth/spotify/refresh-token/", get(spotify_refresh))
        .route("/api/recommendations/", get(list_recommendations))
        .route("/api/recommendations/generate/", post(generate))
        .route("/api/recommendations/{id}/", get(get_recommendation))
        .route("/api/users/profile/", get(get_user_profile).put(put_user_profile))
        .route("/api/users/profile/picture/", post(upload_picture))
        .route("/api/users/genres/", get(get_genres).post(set_genres))
        .route("/api/slow/", get(slow))
        .route("/api/broken/", get(broken))
        .route("/api/echo/", get(content_type_echo))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

/// Serve the mock on a loopback port; returns the API base URL.
pub async fn spawn(backend: Arc<Backend>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

pub fn config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_ms: 2_000,
        long_timeout_ms: 5_000,
        use_proxy: false,
        ..ApiConfig::default()
    }
}

pub fn session_with(access: &str, refresh: &str) -> Session {
    Session::new(Arc::new(MemoryTokenStore::with_credentials(&Credentials::new(
        access, refresh,
    ))))
}

pub fn client(base_url: &str, session: Session) -> ApiClient {
    ApiClient::new(&config(base_url), session).unwrap()
}
