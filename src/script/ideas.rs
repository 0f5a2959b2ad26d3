//! Idea brainstorming from a channel's profile.
//!
//! The model is asked for a JSON array of ideas. Replies are often wrapped in
//! a Markdown code fence, which is stripped before parsing. A reply that does
//! not parse yields no ideas.

use super::ScriptComposer;
use crate::error::Result;
use crate::store::Channel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// One brainstormed idea, before it is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaDraft {
    pub title: String,
    pub hook: Option<String>,
    pub content: Option<String>,
    pub cta: Option<String>,
    pub keywords: Vec<String>,
}

impl ScriptComposer {
    /// Ask the generator for `count` ideas matching the channel's topic,
    /// audience, style and keywords.
    #[instrument(skip(self, channel), fields(channel_id = channel.id))]
    pub async fn brainstorm(&self, channel: &Channel, count: usize) -> Result<Vec<IdeaDraft>> {
        let mut vars = HashMap::new();
        vars.insert("topic".to_string(), channel.topic.clone());
        vars.insert("channel_details".to_string(), channel_details(channel));
        vars.insert("count".to_string(), count.to_string());
        vars.insert("language".to_string(), self.language.clone());

        let system = self.prompts.render_with_custom(&self.prompts.ideas.system, &vars);
        let user = self.prompts.render_with_custom(&self.prompts.ideas.user, &vars);

        let raw = self
            .generator
            .generate(&system, &user)
            .await
            .map_err(|e| e.context("Idea generation failed"))?;

        let ideas = parse_ideas(&raw);
        info!("Brainstormed {} ideas for channel {}", ideas.len(), channel.id);
        Ok(ideas)
    }
}

/// Optional profile lines, one per field the channel has.
fn channel_details(channel: &Channel) -> String {
    let mut details = String::new();
    if let Some(audience) = channel.target_audience.as_deref().filter(|s| !s.is_empty()) {
        details.push_str(&format!("Target audience: {}\n", audience));
    }
    if let Some(style) = channel.content_style.as_deref().filter(|s| !s.is_empty()) {
        details.push_str(&format!("Content style: {}\n", style));
    }
    if !channel.keywords.is_empty() {
        details.push_str(&format!("Keywords: {}\n", channel.keywords.join(", ")));
    }
    details
}

/// Body of the first code fence, preferring a `json` fence, else the whole text.
fn unfenced(text: &str) -> &str {
    let inner = text
        .split_once("```json")
        .or_else(|| text.split_once("```"))
        .map(|(_, rest)| rest.split("```").next().unwrap_or(rest));
    inner.unwrap_or(text).trim()
}

/// Parse a completion into ideas. Malformed replies give an empty list.
pub fn parse_ideas(text: &str) -> Vec<IdeaDraft> {
    match serde_json::from_str::<Vec<IdeaDraft>>(unfenced(text.trim())) {
        Ok(ideas) => ideas,
        Err(e) => {
            warn!("Could not parse ideas from completion: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::testing::FixedGenerator;
    use chrono::Utc;
    use std::sync::Arc;

    const IDEAS_JSON: &str = r#"[
      {"title": "Phone scams", "hook": "Did you get this text?", "content": "How the scam works",
       "cta": "Share with your parents", "keywords": ["scam", "sms"]},
      {"title": "Rate cut"}
    ]"#;

    fn channel() -> Channel {
        Channel {
            id: 4,
            name: "Daily".into(),
            category: "news".into(),
            topic: "Consumer safety".into(),
            description: None,
            target_audience: Some("Parents in their 40s".into()),
            content_style: None,
            keywords: vec!["fraud".into(), "money".into()],
            video_duration: 60,
            privacy_status: "private".into(),
            total_videos: 0,
            total_views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_plain_json() {
        let ideas = parse_ideas(IDEAS_JSON);
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].hook.as_deref(), Some("Did you get this text?"));
        assert_eq!(ideas[0].keywords, vec!["scam", "sms"]);
        assert_eq!(ideas[1].title, "Rate cut");
        assert!(ideas[1].keywords.is_empty());
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("Here you go:\n```json\n{}\n```\nEnjoy!", IDEAS_JSON);
        assert_eq!(parse_ideas(&fenced).len(), 2);

        let bare_fence = format!("```\n{}\n```", IDEAS_JSON);
        assert_eq!(parse_ideas(&bare_fence).len(), 2);
    }

    #[test]
    fn test_malformed_reply_is_empty() {
        assert!(parse_ideas("Sorry, I can't help with that.").is_empty());
        assert!(parse_ideas("```json\n[{\"title\": \n```").is_empty());
        assert!(parse_ideas(r#"{"title": "not a list"}"#).is_empty());
    }

    #[test]
    fn test_channel_details_skip_missing_fields() {
        assert_eq!(
            channel_details(&channel()),
            "Target audience: Parents in their 40s\nKeywords: fraud, money\n"
        );
    }

    #[tokio::test]
    async fn test_brainstorm_uses_channel_profile() {
        let generator = Arc::new(FixedGenerator::new(&format!("```json\n{}\n```", IDEAS_JSON)));
        let composer = ScriptComposer::new(generator.clone(), Prompts::default(), 5, "English");

        let ideas = composer.brainstorm(&channel(), 2).await.unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "Phone scams");

        let (system, user) = generator.last_prompt().unwrap();
        assert!(system.contains("JSON"));
        assert!(user.contains("Channel topic: Consumer safety"));
        assert!(user.contains("Target audience: Parents in their 40s"));
        assert!(!user.contains("Content style"));
        assert!(user.contains("Keywords: fraud, money"));
        assert!(user.contains("Produce 2 ideas"));
        assert!(user.contains("in English"));
    }
}
