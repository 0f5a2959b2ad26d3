//! Generate command - draft a script from trending topics.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::script::GenerationMode;
use anyhow::Result;

/// Run the generate command.
pub async fn run_generate(mode: &str, json: bool, settings: Settings) -> Result<()> {
    let mode: GenerationMode = mode.parse()?;
    preflight::check(Operation::Script, &settings)?;

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Drafting script ({})...", mode.label()));
    let result = orchestrator.generate_script(mode).await;
    spinner.finish_and_clear();
    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        Output::script_result(&result);
        if result.script.is_empty() {
            println!();
            Output::warning("The completion had no [SCRIPT] section. Re-run with --json to inspect it.");
        }
    }

    Ok(())
}
