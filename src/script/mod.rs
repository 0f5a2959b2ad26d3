//! Script drafting: prompt assembly, completion and section extraction.

mod extract;
mod ideas;

pub use extract::{extract, StructuredScript};
pub use ideas::{parse_ideas, IdeaDraft};

use crate::config::Prompts;
use crate::error::{Result, ShortsmithError};
use crate::llm::TextGenerator;
use crate::search::{NewsArticle, TrendingVideo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Which trending sources feed the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    News,
    Youtube,
    Mixed,
}

impl GenerationMode {
    /// Human-readable label used in the prompt and echoed in results.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationMode::News => "Today's news",
            GenerationMode::Youtube => "Trending YouTube",
            GenerationMode::Mixed => "News + trending YouTube combined",
        }
    }
}

impl std::str::FromStr for GenerationMode {
    type Err = ShortsmithError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "news" => Ok(GenerationMode::News),
            "youtube" => Ok(GenerationMode::Youtube),
            "mixed" => Ok(GenerationMode::Mixed),
            _ => Err(ShortsmithError::InvalidInput(format!(
                "Unknown generation mode: {} (expected news, youtube or mixed)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::News => write!(f, "news"),
            GenerationMode::Youtube => write!(f, "youtube"),
            GenerationMode::Mixed => write!(f, "mixed"),
        }
    }
}

/// A news article cited as a source of the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub source: String,
    pub link: String,
    pub date: String,
}

/// Result of drafting a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptResult {
    pub success: bool,
    /// Mode label.
    pub mode: String,
    pub script: String,
    pub titles: Vec<String>,
    pub thumbnails: Vec<String>,
    pub image_prompt: String,
    pub sources: Vec<SourceRef>,
    /// The unparsed completion.
    pub raw: String,
}

impl ScriptResult {
    fn new(mode: GenerationMode, parsed: StructuredScript, sources: Vec<SourceRef>, raw: String) -> Self {
        Self {
            success: true,
            mode: mode.label().to_string(),
            script: parsed.script,
            titles: parsed.titles,
            thumbnails: parsed.thumbnails,
            image_prompt: parsed.image_prompt,
            sources,
            raw,
        }
    }
}

/// Drafts scripts from trending items through a text generator.
pub struct ScriptComposer {
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
    prompt_items: usize,
    language: String,
}

impl ScriptComposer {
    /// Create a composer.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        prompts: Prompts,
        prompt_items: usize,
        language: &str,
    ) -> Self {
        Self {
            generator,
            prompts,
            prompt_items,
            language: language.to_string(),
        }
    }

    /// Draft a script from the given news and videos.
    #[instrument(skip(self, news, videos), fields(mode = %mode, news = news.len(), videos = videos.len()))]
    pub async fn compose(
        &self,
        mode: GenerationMode,
        news: &[NewsArticle],
        videos: &[TrendingVideo],
    ) -> Result<ScriptResult> {
        let mut vars = HashMap::new();
        vars.insert("mode".to_string(), mode.label().to_string());
        vars.insert("language".to_string(), self.language.clone());
        vars.insert("item_count".to_string(), self.prompt_items.to_string());
        vars.insert("news".to_string(), format_news(news, self.prompt_items));
        vars.insert("videos".to_string(), format_videos(videos, self.prompt_items));

        let system = self.prompts.render_with_custom(&self.prompts.script.system, &vars);
        let user = self.prompts.render_with_custom(&self.prompts.script.user, &vars);

        let raw = self
            .generator
            .generate(&system, &user)
            .await
            .map_err(|e| e.context("Script generation failed"))?;

        let parsed = extract(&raw);
        info!(
            "Drafted script: {} chars, {} titles, {} thumbnails",
            parsed.script.chars().count(),
            parsed.titles.len(),
            parsed.thumbnails.len()
        );

        let sources = news
            .iter()
            .take(self.prompt_items)
            .map(|n| SourceRef {
                title: n.title.clone(),
                source: n.source.clone(),
                link: n.link.clone(),
                date: n.date.clone(),
            })
            .collect();

        Ok(ScriptResult::new(mode, parsed, sources, raw))
    }
}

/// Numbered news list for the prompt.
fn format_news(news: &[NewsArticle], limit: usize) -> String {
    if news.is_empty() {
        return "No news data".to_string();
    }
    news.iter()
        .take(limit)
        .enumerate()
        .map(|(i, n)| format!("{}. [{}] {}\n   {}", i + 1, n.source, n.title, n.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Numbered video list for the prompt.
fn format_videos(videos: &[TrendingVideo], limit: usize) -> String {
    if videos.is_empty() {
        return "No video data".to_string();
    }
    videos
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, v)| {
            format!(
                "{}. ({} views) {}\n   Channel: {}",
                i + 1,
                v.views,
                v.title,
                v.channel
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
