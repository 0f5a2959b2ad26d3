//! Pre-flight checks before expensive operations.
//!
//! Validates that credentials and tools are available before starting a run
//! that would otherwise fail midway, after paid API calls.

use crate::config::Settings;
use crate::error::{Result, ShortsmithError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Topic search plus completion.
    Script,
    /// Speech synthesis.
    Voice,
    /// Image generation.
    Thumbnail,
    /// The whole chain, including the encoder.
    Complete,
    /// Idea brainstorming.
    Ideas,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Script => {
            settings.search.api_key()?;
            check_openai_key(settings)?;
        }
        Operation::Voice => {
            settings.voice.credentials()?;
        }
        Operation::Thumbnail | Operation::Ideas => {
            check_openai_key(settings)?;
        }
        Operation::Complete => {
            settings.search.api_key()?;
            check_openai_key(settings)?;
            settings.voice.credentials()?;
            check_tool(&settings.video.ffmpeg)?;
        }
    }
    Ok(())
}

fn check_openai_key(settings: &Settings) -> Result<()> {
    match settings.openai_api_key() {
        Some(_) => Ok(()),
        None => Err(ShortsmithError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an ffmpeg-style tool (`-version`) is available.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(ShortsmithError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ShortsmithError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(ShortsmithError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_voice_passes() {
        let mut settings = Settings::default();
        settings.voice.api_key = Some("xi".to_string());
        settings.voice.voice_id = Some("voice".to_string());
        assert!(check(Operation::Voice, &settings).is_ok());
    }

    #[test]
    fn test_ideas_skip_search_and_voice() {
        let mut settings = Settings::default();
        settings.script.api_key = Some("sk-test".to_string());
        settings.search.api_key = None;
        settings.voice.api_key = None;
        assert!(check(Operation::Ideas, &settings).is_ok());
    }

    #[test]
    fn test_missing_tool() {
        assert!(matches!(
            check_tool("shortsmith-no-such-tool"),
            Err(ShortsmithError::ToolNotFound(_))
        ));
    }
}
