//! Generation endpoints.

use super::{parse_body, ApiError, ApiResult, AppState};
use crate::artifacts::{Artifact, ThumbnailArtifact};
use crate::error::ShortsmithError;
use crate::orchestrator::CompleteResult;
use crate::script::{GenerationMode, ScriptResult};
use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

/// Body accepted by the generation endpoints. Each endpoint reads the fields it needs.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub channel_id: Option<i64>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .ok_or_else(|| ShortsmithError::InvalidInput(format!("{} is required", field)).into())
}

async fn script_for(state: &AppState, mode: GenerationMode) -> ApiResult<ScriptResult> {
    Ok(Json(state.orchestrator.generate_script(mode).await?))
}

pub async fn news(State(state): State<Arc<AppState>>) -> ApiResult<ScriptResult> {
    script_for(&state, GenerationMode::News).await
}

pub async fn youtube(State(state): State<Arc<AppState>>) -> ApiResult<ScriptResult> {
    script_for(&state, GenerationMode::Youtube).await
}

pub async fn mixed(State(state): State<Arc<AppState>>) -> ApiResult<ScriptResult> {
    script_for(&state, GenerationMode::Mixed).await
}

pub async fn voice(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Artifact> {
    let req: GenerationRequest = parse_body(&body)?;
    let script = required(&req.script, "script")?;
    Ok(Json(state.orchestrator.generate_voice(script).await?))
}

pub async fn thumbnail(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<ThumbnailArtifact> {
    let req: GenerationRequest = parse_body(&body)?;
    let prompt = required(&req.prompt, "prompt")?;
    Ok(Json(state.orchestrator.generate_thumbnail(prompt).await?))
}

pub async fn complete(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<CompleteResult> {
    let req: GenerationRequest = parse_body(&body)?;
    let mode: GenerationMode = required(&req.mode, "mode")?.parse()?;
    Ok(Json(
        state
            .orchestrator
            .generate_complete(mode, req.channel_id)
            .await?,
    ))
}
