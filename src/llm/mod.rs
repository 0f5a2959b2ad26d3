//! Text generation (language model completions).

mod openai;

pub use openai::OpenAITextGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for language model providers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce one free-form completion for a system instruction and user prompt.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}
