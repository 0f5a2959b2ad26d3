//! Voice command - synthesize narration for a script.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the voice command.
pub async fn run_voice(script: &str, settings: Settings) -> Result<()> {
    preflight::check(Operation::Voice, &settings)?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Synthesizing narration...");
    let artifact = orchestrator.generate_voice(script).await;
    spinner.finish_and_clear();

    Output::success("Narration saved");
    Output::artifact("Audio", &artifact?);
    Ok(())
}
