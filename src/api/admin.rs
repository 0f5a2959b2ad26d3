//! Admin endpoints: channels, ideas, videos and workflow status.

use super::{parse_body, ApiResult, AppState};
use crate::store::{
    Channel, ChannelStats, ChannelUpdate, Idea, NewChannel, NewIdea, NewVideo, Page, Video,
    WorkflowLog, WorkflowStatus,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub channel_id: Option<i64>,
    pub status: Option<String>,
}

impl ListQuery {
    fn page(&self, default_limit: usize) -> Page {
        Page::new(self.skip, self.limit, default_limit)
    }
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct IdeaRequest {
    #[serde(default = "default_num_ideas")]
    num_ideas: usize,
}

fn default_num_ideas() -> usize {
    3
}

#[derive(Serialize)]
pub struct GeneratedIdeas {
    ideas: Vec<Idea>,
    count: usize,
}

#[derive(Serialize)]
pub struct Deleted {
    message: String,
}

impl Deleted {
    fn new(what: &str) -> Json<Self> {
        Json(Self {
            message: format!("{} deleted successfully", what),
        })
    }
}

// === Channels ===

pub async fn list_channels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Channel>> {
    let store = state.orchestrator.store();
    Ok(Json(store.list_channels(query.page(100))?))
}

pub async fn create_channel(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Channel> {
    let channel: NewChannel = parse_body(&body)?;
    Ok(Json(state.orchestrator.store().create_channel(channel)?))
}

pub async fn get_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Channel> {
    Ok(Json(state.orchestrator.store().get_channel(id)?))
}

pub async fn update_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> ApiResult<Channel> {
    let update: ChannelUpdate = parse_body(&body)?;
    Ok(Json(state.orchestrator.store().update_channel(id, update)?))
}

pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    state.orchestrator.store().delete_channel(id)?;
    Ok(Deleted::new("Channel"))
}

pub async fn channel_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<ChannelStats> {
    Ok(Json(state.orchestrator.store().channel_stats(id)?))
}

// === Ideas ===

pub async fn list_ideas(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Idea>> {
    let store = state.orchestrator.store();
    Ok(Json(store.list_ideas(
        query.channel_id,
        query.status.as_deref(),
        query.page(100),
    )?))
}

pub async fn create_idea(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Idea> {
    let idea: NewIdea = parse_body(&body)?;
    Ok(Json(state.orchestrator.store().create_idea(idea)?))
}

pub async fn get_idea(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Idea> {
    Ok(Json(state.orchestrator.store().get_idea(id)?))
}

pub async fn set_idea_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> ApiResult<Idea> {
    let update: StatusUpdate = parse_body(&body)?;
    Ok(Json(
        state.orchestrator.store().set_idea_status(id, &update.status)?,
    ))
}

pub async fn delete_idea(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    state.orchestrator.store().delete_idea(id)?;
    Ok(Deleted::new("Idea"))
}

// === Videos ===

pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Video>> {
    let store = state.orchestrator.store();
    Ok(Json(store.list_videos(
        query.channel_id,
        query.status.as_deref(),
        query.page(100),
    )?))
}

pub async fn create_video(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Video> {
    let video: NewVideo = parse_body(&body)?;
    Ok(Json(state.orchestrator.store().create_video(video)?))
}

pub async fn get_video(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Video> {
    Ok(Json(state.orchestrator.store().get_video(id)?))
}

pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    state.orchestrator.store().delete_video(id)?;
    Ok(Deleted::new("Video"))
}

// === Workflow ===

pub async fn workflow_status(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<i64>,
) -> ApiResult<WorkflowStatus> {
    Ok(Json(state.orchestrator.store().workflow_status(channel_id)?))
}

pub async fn generate_ideas(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<i64>,
    Query(request): Query<IdeaRequest>,
) -> ApiResult<GeneratedIdeas> {
    let ideas = state
        .orchestrator
        .generate_ideas(channel_id, request.num_ideas)
        .await?;
    Ok(Json(GeneratedIdeas {
        count: ideas.len(),
        ideas,
    }))
}

pub async fn workflow_logs(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<WorkflowLog>> {
    Ok(Json(
        state
            .orchestrator
            .store()
            .list_logs(channel_id, query.page(50))?,
    ))
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_channel_crud_roundtrip() {
        let app = test_app().await;
        let r = &app.router;

        let (status, created) = send(
            r,
            Method::POST,
            "/api/channels",
            Some(json!({"name": "Daily", "category": "news", "topic": "Headlines"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["privacy_status"], "private");
        assert_eq!(created["video_duration"], 60);
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = send(
            r,
            Method::PUT,
            &format!("/api/channels/{id}"),
            Some(json!({"topic": "Tech"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["topic"], "Tech");
        assert_eq!(updated["name"], "Daily");

        let (_, list) = send(r, Method::GET, "/api/channels?skip=0&limit=10", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, stats) = send(r, Method::GET, &format!("/api/channels/{id}/stats"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_videos"], 0);

        let (status, _) = send(r, Method::DELETE, &format!("/api/channels/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(r, Method::GET, &format!("/api/channels/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_invalid_channel_is_bad_request() {
        let app = test_app().await;
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/channels",
            Some(json!({"name": "Daily", "category": "news", "topic": "x", "video_duration": 900})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/channels",
            Some(json!({"category": "news"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ideas_and_videos() {
        let app = test_app().await;
        let r = &app.router;
        let (_, channel) = send(
            r,
            Method::POST,
            "/api/channels",
            Some(json!({"name": "Daily", "category": "news", "topic": "Headlines"})),
        )
        .await;
        let channel_id = channel["id"].as_i64().unwrap();

        let (status, idea) = send(
            r,
            Method::POST,
            "/api/ideas",
            Some(json!({"channel_id": channel_id, "title": "Hook", "keywords": ["a", "b"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(idea["status"], "pending");
        let idea_id = idea["id"].as_i64().unwrap();

        let (status, idea) = send(
            r,
            Method::PUT,
            &format!("/api/ideas/{idea_id}/status"),
            Some(json!({"status": "in_progress"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(idea["status"], "in_progress");

        let (_, ideas) = send(
            r,
            Method::GET,
            &format!("/api/ideas?channel_id={channel_id}&status=in_progress"),
            None,
        )
        .await;
        assert_eq!(ideas.as_array().unwrap().len(), 1);

        let (status, video) = send(
            r,
            Method::POST,
            "/api/videos",
            Some(json!({"channel_id": channel_id, "title": "First"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let video_id = video["id"].as_i64().unwrap();

        let (status, _) = send(r, Method::GET, &format!("/api/videos/{video_id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, workflow) = send(
            r,
            Method::GET,
            &format!("/api/workflow/status/{channel_id}"),
            None,
        )
        .await;
        assert_eq!(workflow["status"], "idle");
        assert_eq!(workflow["in_progress_videos"], 1);

        let (status, _) = send(r, Method::DELETE, &format!("/api/videos/{video_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(r, Method::DELETE, &format!("/api/ideas/{idea_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(r, Method::GET, &format!("/api/ideas/{idea_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_complete_run_shows_up_in_workflow_logs() {
        let app = test_app().await;
        let r = &app.router;
        let (_, channel) = send(
            r,
            Method::POST,
            "/api/channels",
            Some(json!({"name": "Daily", "category": "news", "topic": "Headlines"})),
        )
        .await;
        let channel_id = channel["id"].as_i64().unwrap();

        let (status, result) = send(
            r,
            Method::POST,
            "/api/generate/complete",
            Some(json!({"mode": "news", "channel_id": channel_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(result["video_id"].is_i64());

        let (_, logs) = send(
            r,
            Method::GET,
            &format!("/api/workflow/logs/{channel_id}?limit=3"),
            None,
        )
        .await;
        assert_eq!(logs.as_array().unwrap().len(), 3);
        assert_eq!(logs[0]["step"], "record");
        assert_eq!(logs[0]["video_id"], result["video_id"]);
        assert_eq!(logs[1]["step"], "video");

        let (_, videos) = send(r, Method::GET, &format!("/api/videos?channel_id={channel_id}"), None).await;
        assert_eq!(videos[0]["title"], "Headline");
    }

    #[tokio::test]
    async fn test_generate_ideas_endpoint() {
        let app = test_app().await;
        let r = &app.router;
        let (_, channel) = send(
            r,
            Method::POST,
            "/api/channels",
            Some(json!({"name": "Daily", "category": "news", "topic": "Headlines"})),
        )
        .await;
        let channel_id = channel["id"].as_i64().unwrap();

        // The stub completion is a script, not a JSON list of ideas.
        let (status, body) = send(
            r,
            Method::POST,
            &format!("/api/workflow/generate-ideas/{channel_id}?num_ideas=2"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
        assert!(body["ideas"].as_array().unwrap().is_empty());
        assert_eq!(app.calls.generate.load(Ordering::SeqCst), 1);

        let (_, logs) = send(r, Method::GET, &format!("/api/workflow/logs/{channel_id}"), None).await;
        assert_eq!(logs[0]["step"], "idea_generation");
        assert_eq!(logs[0]["status"], "completed");

        let (status, _) = send(
            r,
            Method::POST,
            &format!("/api/workflow/generate-ideas/{channel_id}?num_ideas=0"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(r, Method::POST, "/api/workflow/generate-ideas/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(app.calls.generate.load(Ordering::SeqCst), 1);
    }
}
