//! Thumbnail command - generate a thumbnail image.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the thumbnail command.
pub async fn run_thumbnail(prompt: &str, settings: Settings) -> Result<()> {
    preflight::check(Operation::Thumbnail, &settings)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Generating thumbnail...");
    let thumbnail = orchestrator.generate_thumbnail(prompt).await;
    spinner.finish_and_clear();
    let thumbnail = thumbnail?;

    Output::success("Thumbnail saved");
    Output::artifact("Image", &thumbnail.artifact);
    Output::kv("Source URL", &thumbnail.url);
    Ok(())
}
