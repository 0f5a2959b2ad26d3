//! ElevenLabs text-to-speech implementation.

use super::SpeechSynthesizer;
use crate::config::VoiceSettings;
use crate::error::{Result, ShortsmithError};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

/// ElevenLabs-based speech synthesizer.
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    settings: VoiceSettings,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceTuning,
}

#[derive(Serialize)]
struct VoiceTuning {
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsSynthesizer {
    /// Create a synthesizer from settings. Credentials are resolved per call.
    pub fn new(settings: VoiceSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let (api_key, voice_id) = self.settings.credentials()?;
        let url = format!(
            "{}/text-to-speech/{}",
            self.settings.base_url.trim_end_matches('/'),
            voice_id
        );

        let body = SpeechRequest {
            text,
            model_id: &self.settings.model_id,
            voice_settings: VoiceTuning {
                stability: self.settings.stability,
                similarity_boost: self.settings.similarity_boost,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(ShortsmithError::Upstream(format!(
                "ElevenLabs API error ({}): {}",
                status, error
            )));
        }

        let audio = response.bytes().await?;
        debug!("Received {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }
}
