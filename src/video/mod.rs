//! Video composition from a still image and a narration track.

mod ffmpeg;

pub use ffmpeg::FfmpegEncoder;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for video encoders.
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    /// Mux `image` and `audio` into a vertical MP4 at `output`.
    async fn encode(&self, image: &Path, audio: &Path, output: &Path) -> Result<()>;
}
