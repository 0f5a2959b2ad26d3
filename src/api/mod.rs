//! HTTP API: generation endpoints, artifact serving and the admin surface.

mod admin;
mod generate;

use crate::artifacts::content_type;
use crate::error::ShortsmithError;
use crate::orchestrator::Orchestrator;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub orchestrator: Orchestrator,
    started: Instant,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            started: Instant::now(),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate/news", post(generate::news))
        .route("/api/generate/youtube", post(generate::youtube))
        .route("/api/generate/mixed", post(generate::mixed))
        .route("/api/generate/voice", post(generate::voice))
        .route("/api/generate/thumbnail", post(generate::thumbnail))
        .route("/api/generate/complete", post(generate::complete))
        .route("/output/{filename}", get(output_file))
        .route(
            "/api/channels",
            get(admin::list_channels).post(admin::create_channel),
        )
        .route(
            "/api/channels/{id}",
            get(admin::get_channel)
                .put(admin::update_channel)
                .delete(admin::delete_channel),
        )
        .route("/api/channels/{id}/stats", get(admin::channel_stats))
        .route("/api/ideas", get(admin::list_ideas).post(admin::create_idea))
        .route(
            "/api/ideas/{id}",
            get(admin::get_idea).delete(admin::delete_idea),
        )
        .route("/api/ideas/{id}/status", put(admin::set_idea_status))
        .route(
            "/api/videos",
            get(admin::list_videos).post(admin::create_video),
        )
        .route(
            "/api/videos/{id}",
            get(admin::get_video).delete(admin::delete_video),
        )
        .route("/api/workflow/status/{channel_id}", get(admin::workflow_status))
        .route("/api/workflow/logs/{channel_id}", get(admin::workflow_logs))
        .route(
            "/api/workflow/generate-ideas/{channel_id}",
            post(admin::generate_ideas),
        )
        .layer(cors)
        .with_state(state)
}

/// Failure body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Failure {
    pub success: bool,
    /// Short category.
    pub error: String,
    /// Full message.
    pub detail: String,
}

/// Handler error carrying a library error.
pub struct ApiError(ShortsmithError);

impl From<ShortsmithError> for ApiError {
    fn from(e: ShortsmithError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ShortsmithError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ShortsmithError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected: {}", self.0);
        }

        let body = Failure {
            success: false,
            error: self.0.category().to_string(),
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Parse a JSON request body, reporting problems as invalid input.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let bytes: &[u8] = if body.is_empty() { &b"{}"[..] } else { &body[..] };
    serde_json::from_slice(bytes)
        .map_err(|e| ShortsmithError::InvalidInput(format!("Invalid request body: {}", e)).into())
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    timestamp: String,
    uptime_seconds: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.started.elapsed().as_secs(),
    })
}

async fn output_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.orchestrator.output().resolve(&filename)?;
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ShortsmithError::NotFound(format!("No such artifact: {}", filename)).into());
        }
        Err(e) => return Err(ShortsmithError::Io(e).into()),
    };

    Ok(([(header::CONTENT_TYPE, content_type(&filename))], bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Prompts, Settings};
    use crate::store::RecordStore;
    use crate::testing::{image_server, providers, Calls, COMPLETION};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;
    use wiremock::MockServer;

    pub(crate) struct TestApp {
        pub router: Router,
        pub state: Arc<AppState>,
        pub calls: Arc<Calls>,
        _dir: tempfile::TempDir,
        _server: MockServer,
    }

    pub(crate) async fn test_app() -> TestApp {
        let server = image_server().await;
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.output_dir = dir.path().join("output").to_string_lossy().into_owned();

        let calls = Arc::new(Calls::default());
        let orchestrator = Orchestrator::with_components(
            &settings,
            Prompts::default(),
            providers(&calls, &server, None),
            Arc::new(RecordStore::in_memory().unwrap()),
        )
        .unwrap();

        let state = Arc::new(AppState::new(orchestrator));
        TestApp {
            router: router(state.clone()),
            state,
            calls,
            _dir: dir,
            _server: server,
        }
    }

    /// Send a request and return status plus parsed JSON body.
    pub(crate) async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, json) = send(&app.router, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert!(json["uptime_seconds"].is_u64());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_generate_news_returns_script() {
        let app = test_app().await;
        let (status, json) = send(&app.router, Method::POST, "/api/generate/news", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["script"], "Big news today");
        assert_eq!(json["imagePrompt"], "newsroom at night");
        assert_eq!(json["raw"], COMPLETION);
    }

    #[tokio::test]
    async fn test_voice_requires_script() {
        let app = test_app().await;
        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/generate/voice",
            Some(serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "invalid_input");
        assert!(json["detail"].as_str().unwrap().contains("script"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_input() {
        let app = test_app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/generate/thumbnail")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_voice_artifact_is_served() {
        let app = test_app().await;
        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/generate/voice",
            Some(serde_json::json!({"script": "Hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let filename = json["filename"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri(format!("/output/{}", filename))
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], crate::testing::AUDIO_BYTES);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_found() {
        let app = test_app().await;
        let (status, json) =
            send(&app.router, Method::GET, "/output/shorts_1.mp4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_complete_with_unknown_channel() {
        let app = test_app().await;
        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/generate/complete",
            Some(serde_json::json!({"mode": "news", "channel_id": 77})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
        assert_eq!(
            app.calls.news.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn test_complete_requires_known_mode() {
        let app = test_app().await;
        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/generate/complete",
            Some(serde_json::json!({"mode": "podcast"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_complete_run() {
        let app = test_app().await;
        let (status, json) = send(
            &app.router,
            Method::POST,
            "/api/generate/complete",
            Some(serde_json::json!({"mode": "mixed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["video"]["filename"]
            .as_str()
            .unwrap()
            .starts_with("shorts_"));
        assert!(json["thumbnail"]["url"].is_string());
        assert!(app.state.orchestrator.output().root().exists());
    }
}
