//! Complete command - run the whole chain.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::script::GenerationMode;
use anyhow::Result;

/// Run the complete command.
pub async fn run_complete(mode: &str, channel: Option<i64>, settings: Settings) -> Result<()> {
    let mode: GenerationMode = mode.parse()?;
    preflight::check(Operation::Complete, &settings)?;

    let orchestrator = Orchestrator::new(settings)?;
    if let Some(id) = channel {
        let channel = orchestrator.store().get_channel(id)?;
        Output::info(&format!("Recording run for channel '{}'", channel.name));
    }

    let spinner = Output::spinner("Running script, voice, thumbnail and video...");
    let result = orchestrator.generate_complete(mode, channel).await;
    spinner.finish_and_clear();
    let result = result?;

    Output::script_result(&result.script);
    Output::header("Artifacts");
    Output::artifact("Audio", &result.voice);
    Output::artifact("Thumbnail", &result.thumbnail.artifact);
    Output::artifact("Video", &result.video);
    if let Some(video_id) = result.video_id {
        Output::kv("Video record", &video_id.to_string());
    }
    println!();
    Output::success("Short is ready.");

    Ok(())
}
