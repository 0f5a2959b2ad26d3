//! Speech synthesis for narration audio.

mod elevenlabs;

pub use elevenlabs::ElevenLabsSynthesizer;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for speech synthesis providers.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return encoded audio (MP3) bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
