//! Configuration settings for shortsmith.

use crate::error::{Result, ShortsmithError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub script: ScriptSettings,
    pub voice: VoiceSettings,
    pub image: ImageSettings,
    pub video: VideoSettings,
    pub store: StoreSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Shared directory for generated audio, images and videos.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.shortsmith".to_string(),
            output_dir: "~/.shortsmith/output".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Topic search (SerpAPI) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// SerpAPI key. Falls back to `SERPAPI_KEY`.
    pub api_key: Option<String>,
    /// Search endpoint.
    pub base_url: String,
    /// Google News query.
    pub news_query: String,
    /// YouTube query for trending news shorts.
    pub video_query: String,
    /// Country code (`gl`).
    pub country: String,
    /// Interface language (`hl`).
    pub language: String,
    /// Maximum results kept from each search.
    pub top_n: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://serpapi.com/search".to_string(),
            news_query: "한국 뉴스 OR 속보 OR 논란".to_string(),
            video_query: "속보 뉴스 쇼츠 OR 논란 OR 해킹 OR 이슈".to_string(),
            country: "kr".to_string(),
            language: "ko".to_string(),
            top_n: 10,
        }
    }
}

impl SearchSettings {
    /// Resolve the SerpAPI key from config or environment.
    pub fn api_key(&self) -> Result<String> {
        resolve_secret(self.api_key.as_deref(), "SERPAPI_KEY")
            .ok_or_else(|| ShortsmithError::Config("SERPAPI_KEY is not set".to_string()))
    }
}

/// Script generation (chat completion) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// OpenAI API key. Falls back to `OPENAI_API_KEY`.
    pub api_key: Option<String>,
    /// Chat model.
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Number of news items / videos included in the prompt.
    pub prompt_items: usize,
    /// Language the script should be written in.
    pub language: String,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o".to_string(),
            temperature: 0.8,
            max_tokens: 2000,
            prompt_items: 5,
            language: "Korean".to_string(),
        }
    }
}

/// Speech synthesis (ElevenLabs) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// ElevenLabs API key. Falls back to `ELEVENLABS_API_KEY`.
    pub api_key: Option<String>,
    /// Voice to synthesize with. Falls back to `ELEVENLABS_VOICE_ID`.
    pub voice_id: Option<String>,
    pub base_url: String,
    pub model_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

impl VoiceSettings {
    /// Resolve the ElevenLabs key and voice id, both required.
    pub fn credentials(&self) -> Result<(String, String)> {
        let key = resolve_secret(self.api_key.as_deref(), "ELEVENLABS_API_KEY");
        let voice = resolve_secret(self.voice_id.as_deref(), "ELEVENLABS_VOICE_ID");
        match (key, voice) {
            (Some(key), Some(voice)) => Ok((key, voice)),
            _ => Err(ShortsmithError::Config(
                "ELEVENLABS_API_KEY or ELEVENLABS_VOICE_ID is not set".to_string(),
            )),
        }
    }
}

/// Thumbnail image generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub model: String,
    /// Image size, e.g. "1024x1024".
    pub size: String,
    /// "standard" or "hd".
    pub quality: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
        }
    }
}

/// Video encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// ffmpeg binary to invoke.
    pub ffmpeg: String,
    pub width: u32,
    pub height: u32,
    /// Hard cap on output length in seconds.
    pub max_seconds: u32,
    pub audio_bitrate: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            width: 1080,
            height: 1920,
            max_seconds: 60,
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the SQLite database.
    pub sqlite_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            sqlite_path: "~/.shortsmith/shortsmith.db".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

/// Config value first, then a non-empty environment variable.
fn resolve_secret(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ShortsmithError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shortsmith")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.store.sqlite_path)
    }

    /// OpenAI key from config or `OPENAI_API_KEY`, if any.
    pub fn openai_api_key(&self) -> Option<String> {
        resolve_secret(self.script.api_key.as_deref(), "OPENAI_API_KEY")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [video]
            max_seconds = 45

            [search]
            top_n = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.video.max_seconds, 45);
        assert_eq!(settings.video.width, 1080);
        assert_eq!(settings.search.top_n, 3);
        assert_eq!(settings.search.country, "kr");
        assert_eq!(settings.script.model, "gpt-4o");
    }

    #[test]
    fn test_configured_secret_wins() {
        let voice = VoiceSettings {
            api_key: Some("key-from-file".to_string()),
            voice_id: Some("voice-from-file".to_string()),
            ..Default::default()
        };
        let (key, id) = voice.credentials().unwrap();
        assert_eq!(key, "key-from-file");
        assert_eq!(id, "voice-from-file");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.server.port = 8080;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 8080);
    }
}
