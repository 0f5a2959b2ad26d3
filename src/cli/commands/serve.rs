//! HTTP API server.

use crate::api::{router, AppState};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use std::sync::Arc;
use tracing::info;

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    let output_dir = orchestrator.output().root().display().to_string();
    let app = router(Arc::new(AppState::new(orchestrator)));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("shortsmith API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Output directory", &output_dir);
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /api/health");
    Output::kv("Script", "POST /api/generate/{news,youtube,mixed}");
    Output::kv("Voice", "POST /api/generate/voice");
    Output::kv("Thumbnail", "POST /api/generate/thumbnail");
    Output::kv("Complete", "POST /api/generate/complete");
    Output::kv("Artifacts", "GET  /output/{filename}");
    Output::kv("Channels", "/api/channels[/{id}[/stats]]");
    Output::kv("Ideas", "/api/ideas[/{id}[/status]]");
    Output::kv("Videos", "/api/videos[/{id}]");
    Output::kv("Workflow", "GET  /api/workflow/{status,logs}/{channel_id}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}
