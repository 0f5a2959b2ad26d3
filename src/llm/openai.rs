//! OpenAI chat completion implementation.

use super::TextGenerator;
use crate::config::ScriptSettings;
use crate::error::{Result, ShortsmithError};
use crate::openai::{create_client, has_api_key, missing_key_error};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-based text generator.
pub struct OpenAITextGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    has_key: bool,
}

impl OpenAITextGenerator {
    /// Create a generator from script settings, using `api_key` when given.
    pub fn with_config(settings: &ScriptSettings, api_key: Option<&str>) -> Self {
        Self {
            client: create_client(api_key),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            has_key: has_api_key(api_key),
        }
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAITextGenerator {
    #[instrument(skip(self, system, user), fields(model = %self.model))]
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        if !self.has_key {
            return Err(missing_key_error());
        }

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| ShortsmithError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(|e| ShortsmithError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| ShortsmithError::OpenAI(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ShortsmithError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| ShortsmithError::UpstreamEmpty("Empty response from LLM".to_string()))?
            .clone();

        debug!("Received {} characters of completion", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_uses_configured_model() {
        let settings = ScriptSettings {
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let generator = OpenAITextGenerator::with_config(&settings, Some("sk-test"));
        assert_eq!(generator.model(), "gpt-4o-mini");
        assert_eq!(generator.max_tokens, 2000);
    }
}
