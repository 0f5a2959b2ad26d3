//! Thumbnail image generation.

mod dalle;

pub use dalle::DalleImageGenerator;

use crate::error::{Result, ShortsmithError};
use async_trait::async_trait;
use tracing::debug;

/// Trait for image generation providers.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for `prompt` and return a URL where it can be fetched.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Download generated image bytes from a provider URL.
pub async fn download_image(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ShortsmithError::Upstream(format!(
            "Image download returned {}: {}",
            status, body
        )));
    }

    let bytes = response.bytes().await?;
    debug!("Downloaded {} bytes of image data", bytes.len());
    Ok(bytes.to_vec())
}
