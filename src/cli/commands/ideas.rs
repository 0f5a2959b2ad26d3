//! Ideas command - brainstorm and store ideas for a channel.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ideas command.
pub async fn run_ideas(channel: i64, count: usize, json: bool, settings: Settings) -> Result<()> {
    preflight::check(Operation::Ideas, &settings)?;

    let orchestrator = Orchestrator::new(settings)?;
    let name = orchestrator.store().get_channel(channel)?.name;

    let spinner = Output::spinner(&format!("Brainstorming {} ideas for '{}'...", count, name));
    let ideas = orchestrator.generate_ideas(channel, count).await;
    spinner.finish_and_clear();
    let ideas = ideas?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ideas)?);
        return Ok(());
    }

    if ideas.is_empty() {
        Output::warning("The completion held no usable ideas. Nothing was stored.");
        return Ok(());
    }

    for idea in &ideas {
        Output::header(&format!("#{} {}", idea.id, idea.title));
        if let Some(hook) = &idea.hook {
            Output::kv("Hook", hook);
        }
        if let Some(content) = &idea.content {
            Output::kv("Content", content);
        }
        if let Some(cta) = &idea.cta {
            Output::kv("CTA", cta);
        }
        if !idea.keywords.is_empty() {
            Output::kv("Keywords", &idea.keywords.join(", "));
        }
    }
    println!();
    Output::success(&format!("Stored {} pending ideas.", ideas.len()));

    Ok(())
}
