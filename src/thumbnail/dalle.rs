//! OpenAI image generation (DALL-E) implementation.

use super::ImageGenerator;
use crate::config::ImageSettings;
use crate::error::{Result, ShortsmithError};
use crate::openai::{create_client, has_api_key, missing_key_error};
use async_openai::types::{
    CreateImageRequestArgs, Image, ImageModel, ImageQuality, ImageResponseFormat, ImageSize,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// DALL-E based image generator.
pub struct DalleImageGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: ImageModel,
    size: ImageSize,
    quality: ImageQuality,
    has_key: bool,
}

impl DalleImageGenerator {
    /// Create a generator from image settings, using `api_key` when given.
    pub fn with_config(settings: &ImageSettings, api_key: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: create_client(api_key),
            model: parse_model(&settings.model),
            size: parse_size(&settings.size)?,
            quality: parse_quality(&settings.quality)?,
            has_key: has_api_key(api_key),
        })
    }
}

fn parse_model(model: &str) -> ImageModel {
    match model {
        "dall-e-3" => ImageModel::DallE3,
        "dall-e-2" => ImageModel::DallE2,
        other => ImageModel::Other(other.to_string()),
    }
}

fn parse_size(size: &str) -> Result<ImageSize> {
    match size {
        "256x256" => Ok(ImageSize::S256x256),
        "512x512" => Ok(ImageSize::S512x512),
        "1024x1024" => Ok(ImageSize::S1024x1024),
        "1792x1024" => Ok(ImageSize::S1792x1024),
        "1024x1792" => Ok(ImageSize::S1024x1792),
        other => Err(ShortsmithError::Config(format!("Unsupported image size: {}", other))),
    }
}

fn parse_quality(quality: &str) -> Result<ImageQuality> {
    match quality {
        "standard" => Ok(ImageQuality::Standard),
        "hd" => Ok(ImageQuality::HD),
        other => Err(ShortsmithError::Config(format!("Unsupported image quality: {}", other))),
    }
}

#[async_trait]
impl ImageGenerator for DalleImageGenerator {
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        if !self.has_key {
            return Err(missing_key_error());
        }

        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(self.model.clone())
            .size(self.size.clone())
            .quality(self.quality.clone())
            .response_format(ImageResponseFormat::Url)
            .n(1)
            .build()
            .map_err(|e| ShortsmithError::OpenAI(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .images()
            .create(request)
            .await
            .map_err(|e| ShortsmithError::OpenAI(format!("Image generation failed: {}", e)))?;

        let url = response
            .data
            .first()
            .and_then(|image| match image.as_ref() {
                Image::Url { url, .. } => Some(url.clone()),
                _ => None,
            })
            .ok_or_else(|| {
                ShortsmithError::UpstreamEmpty("Image response contained no URL".to_string())
            })?;

        debug!("Generated image at {}", url);
        Ok(url)
    }
}
