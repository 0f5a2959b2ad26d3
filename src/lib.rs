//! shortsmith - trending topics to vertical short videos
//!
//! Turns what is trending right now into a ready-to-upload vertical video.
//!
//! # Overview
//!
//! shortsmith can:
//! - Search trending news and YouTube videos for a keyword
//! - Draft a narration script, titles and an image prompt with an LLM
//! - Synthesize the narration with a text-to-speech service
//! - Generate a thumbnail and render a 1080x1920 MP4 with ffmpeg
//! - Serve all of the above over HTTP, with a small admin record store
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `search` - Trending topic search
//! - `llm` - Text generation
//! - `script` - Prompt building and completion parsing
//! - `voice` - Speech synthesis
//! - `thumbnail` - Image generation and download
//! - `video` - Video encoding
//! - `artifacts` - Output directory and artifact naming
//! - `store` - Channels, ideas, videos and workflow logs
//! - `orchestrator` - Chains the stages together
//! - `api` - HTTP surface
//!
//! # Example
//!
//! ```rust,no_run
//! use shortsmith::config::Settings;
//! use shortsmith::orchestrator::Orchestrator;
//! use shortsmith::script::GenerationMode;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator.generate_complete(GenerationMode::Mixed, None).await?;
//!     println!("Rendered {}", result.video.filepath);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod script;
pub mod search;
pub mod store;
pub mod thumbnail;
pub mod video;
pub mod voice;

#[cfg(test)]
mod testing;

pub use error::{Result, ShortsmithError};
