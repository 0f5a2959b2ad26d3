//! OpenAI client configuration with sensible defaults.

use crate::error::ShortsmithError;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;
use tracing::warn;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Whether a key is available, either given explicitly or via `OPENAI_API_KEY`.
pub fn has_api_key(api_key: Option<&str>) -> bool {
    api_key.is_some_and(|k| !k.is_empty())
        || std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty())
}

/// Error returned by OpenAI-backed providers that have no key.
pub fn missing_key_error() -> ShortsmithError {
    ShortsmithError::Config("OPENAI_API_KEY is not set".to_string())
}

/// Create an OpenAI client with the default timeout.
///
/// Without an explicit key the client reads `OPENAI_API_KEY` itself.
pub fn create_client(api_key: Option<&str>) -> Client<OpenAIConfig> {
    create_client_with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(api_key: Option<&str>, timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        });

    let config = match api_key {
        Some(key) => OpenAIConfig::new().with_api_key(key),
        None => OpenAIConfig::default(),
    };

    Client::with_config(config).with_http_client(http_client)
}
