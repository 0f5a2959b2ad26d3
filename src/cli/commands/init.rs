//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};
use std::path::Path;

/// Credentials the generation chain reads from the environment.
const CREDENTIALS: [(&str, &str); 4] = [
    ("OPENAI_API_KEY", "https://platform.openai.com/api-keys"),
    ("SERPAPI_KEY", "https://serpapi.com/manage-api-key"),
    ("ELEVENLABS_API_KEY", "https://elevenlabs.io/app/settings/api-keys"),
    ("ELEVENLABS_VOICE_ID", "https://elevenlabs.io/app/voice-library"),
];

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("shortsmith Setup");
    println!();
    println!("Let's make sure everything is in place to render shorts.\n");

    println!("{}", style("Step 1: Checking ffmpeg").bold().cyan());
    println!();

    let ffmpeg = &settings.video.ffmpeg;
    if std::process::Command::new(ffmpeg)
        .arg("-version")
        .output()
        .is_err()
    {
        Output::warning(&format!("{} was not found.", ffmpeg));
        println!("    {} {}", style("→").dim(), style(install_hint()).dim());
        println!();

        if !prompt_continue("Continue anyway?")? {
            println!();
            Output::info("Setup cancelled. Install ffmpeg and run 'shortsmith init' again.");
            return Ok(());
        }
    } else {
        Output::success("ffmpeg is installed!");
    }

    println!();

    println!("{}", style("Step 2: Checking API credentials").bold().cyan());
    println!();

    let missing = missing_credentials(|name| std::env::var(name).ok());
    if missing.is_empty() {
        Output::success("All API credentials are configured!");
    } else {
        Output::warning("Some credentials are not set:");
        println!();
        for (name, url) in &missing {
            println!("  {} {}", style("✗").red(), style(name).bold());
            println!("    {} {}", style("→").dim(), style(url).dim());
        }
        println!();
        println!("  Set them in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!("  or put them under [search], [script] and [voice] in the config file.");
        println!();

        if !prompt_continue("Continue without them?")? {
            println!();
            Output::info("Setup cancelled. Set your credentials and run 'shortsmith init' again.");
            return Ok(());
        }
    }

    println!();

    println!("{}", style("Step 3: Setting up directories").bold().cyan());
    println!();

    ensure_dir("Data directory", &settings.data_dir())?;
    ensure_dir("Output directory", &settings.output_dir())?;

    println!();

    println!("{}", style("Step 4: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("shortsmith config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("shortsmith doctor").cyan());
    println!("  {} Draft a script", style("shortsmith generate news").cyan());
    println!("  {} Render a full short", style("shortsmith complete mixed").cyan());
    println!("  {} Start the API server", style("shortsmith serve").cyan());
    println!();
    println!("For more help: {}", style("shortsmith --help").cyan());

    Ok(())
}

fn ensure_dir(label: &str, dir: &Path) -> io::Result<()> {
    if dir.exists() {
        Output::info(&format!("{} exists: {}", label, dir.display()));
    } else {
        std::fs::create_dir_all(dir)?;
        Output::success(&format!("Created {}: {}", label.to_lowercase(), dir.display()));
    }
    Ok(())
}

/// Credentials whose lookup yields nothing or an empty value.
fn missing_credentials<F>(lookup: F) -> Vec<(&'static str, &'static str)>
where
    F: Fn(&str) -> Option<String>,
{
    CREDENTIALS
        .iter()
        .filter(|(name, _)| lookup(name).map_or(true, |v| v.is_empty()))
        .copied()
        .collect()
}

/// Platform-specific install hint for ffmpeg.
pub(crate) fn install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_hint_mentions_ffmpeg() {
        assert!(install_hint().contains("ffmpeg"));
    }

    #[test]
    fn test_missing_credentials() {
        let missing = missing_credentials(|name| match name {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "SERPAPI_KEY" => Some(String::new()),
            _ => None,
        });
        let names: Vec<&str> = missing.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["SERPAPI_KEY", "ELEVENLABS_API_KEY", "ELEVENLABS_VOICE_ID"]
        );
    }

    #[test]
    fn test_ensure_dir_creates() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        ensure_dir("Output directory", &target).unwrap();
        assert!(target.is_dir());
    }
}
