//! Record store for the admin surface.
//!
//! Channels own ideas, videos and workflow logs. Deleting a channel removes
//! everything it owns.

mod sqlite;

pub use sqlite::RecordStore;

use crate::error::{Result, ShortsmithError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PRIVACY_STATUSES: [&str; 3] = ["public", "private", "unlisted"];
pub const IDEA_STATUSES: [&str; 4] = ["pending", "in_progress", "completed", "failed"];
pub const VIDEO_STATUSES: [&str; 5] = ["pending", "rendering", "completed", "uploaded", "failed"];
pub const LOG_STATUSES: [&str; 3] = ["started", "completed", "failed"];

/// Offset pagination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(skip: Option<usize>, limit: Option<usize>, default_limit: usize) -> Self {
        Self {
            skip: skip.unwrap_or(0),
            limit: limit.unwrap_or(default_limit),
        }
    }
}

/// A publishing channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub topic: String,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub content_style: Option<String>,
    pub keywords: Vec<String>,
    /// Target video length in seconds.
    pub video_duration: u32,
    pub privacy_status: String,
    pub total_videos: i64,
    pub total_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_video_duration() -> u32 {
    60
}

fn default_privacy() -> String {
    "private".to_string()
}

/// Fields accepted when creating a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChannel {
    pub name: String,
    pub category: String,
    pub topic: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub content_style: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_video_duration")]
    pub video_duration: u32,
    #[serde(default = "default_privacy")]
    pub privacy_status: String,
}

impl NewChannel {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_topic(&self.topic)?;
        validate_duration(self.video_duration)?;
        validate_choice("privacy_status", &self.privacy_status, &PRIVACY_STATUSES)
    }
}

/// Partial channel update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub topic: Option<String>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub content_style: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub video_duration: Option<u32>,
    pub privacy_status: Option<String>,
}

impl ChannelUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(topic) = &self.topic {
            validate_topic(topic)?;
        }
        if let Some(duration) = self.video_duration {
            validate_duration(duration)?;
        }
        if let Some(privacy) = &self.privacy_status {
            validate_choice("privacy_status", privacy, &PRIVACY_STATUSES)?;
        }
        Ok(())
    }

    fn apply(self, channel: &mut Channel) {
        if let Some(v) = self.name {
            channel.name = v;
        }
        if let Some(v) = self.category {
            channel.category = v;
        }
        if let Some(v) = self.topic {
            channel.topic = v;
        }
        if self.description.is_some() {
            channel.description = self.description;
        }
        if self.target_audience.is_some() {
            channel.target_audience = self.target_audience;
        }
        if self.content_style.is_some() {
            channel.content_style = self.content_style;
        }
        if let Some(v) = self.keywords {
            channel.keywords = v;
        }
        if let Some(v) = self.video_duration {
            channel.video_duration = v;
        }
        if let Some(v) = self.privacy_status {
            channel.privacy_status = v;
        }
    }
}

/// Aggregate numbers for one channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub avg_views_per_video: f64,
    pub recent_videos: Vec<Video>,
}

/// A content idea for a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: i64,
    pub channel_id: i64,
    pub title: String,
    pub hook: Option<String>,
    pub content: Option<String>,
    pub cta: Option<String>,
    pub keywords: Vec<String>,
    pub script: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdea {
    pub channel_id: i64,
    pub title: String,
    #[serde(default)]
    pub hook: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A produced (or in-production) video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub channel_id: i64,
    pub idea_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub audio_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub video_path: Option<String>,
    pub youtube_video_id: Option<String>,
    pub duration: Option<i64>,
    pub file_size: Option<i64>,
    pub status: String,
    pub error_message: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_video_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVideo {
    pub channel_id: i64,
    #[serde(default)]
    pub idea_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default = "default_video_status")]
    pub status: String,
}

impl NewVideo {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ShortsmithError::InvalidInput("title must not be empty".into()));
        }
        validate_choice("status", &self.status, &VIDEO_STATUSES)
    }
}

/// One step event of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowLog {
    pub id: i64,
    pub channel_id: i64,
    pub video_id: Option<i64>,
    pub step: String,
    pub status: String,
    pub message: Option<String>,
    pub error: Option<String>,
    pub execution_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewWorkflowLog {
    pub channel_id: i64,
    pub video_id: Option<i64>,
    pub step: String,
    pub status: String,
    pub message: Option<String>,
    pub error: Option<String>,
    pub execution_ms: Option<i64>,
}

/// Derived state of a channel's workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStatus {
    pub channel_id: i64,
    /// `running` or `idle`.
    pub status: String,
    pub current_step: Option<String>,
    pub progress: u8,
    pub in_progress_videos: i64,
    pub recent_logs: Vec<WorkflowLog>,
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(1..=200).contains(&len) {
        return Err(ShortsmithError::InvalidInput(
            "name must be 1 to 200 characters".into(),
        ));
    }
    Ok(())
}

fn validate_topic(topic: &str) -> Result<()> {
    let len = topic.chars().count();
    if !(1..=500).contains(&len) {
        return Err(ShortsmithError::InvalidInput(
            "topic must be 1 to 500 characters".into(),
        ));
    }
    Ok(())
}

fn validate_duration(seconds: u32) -> Result<()> {
    if !(15..=300).contains(&seconds) {
        return Err(ShortsmithError::InvalidInput(format!(
            "video_duration must be between 15 and 300 seconds, got {}",
            seconds
        )));
    }
    Ok(())
}

pub(crate) fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ShortsmithError::InvalidInput(format!(
            "{} must be one of {}, got {:?}",
            field,
            allowed.join(", "),
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_json(extra: &str) -> String {
        format!(r#"{{"name": "Daily", "category": "news", "topic": "Korean headlines"{extra}}}"#)
    }

    #[test]
    fn test_new_channel_defaults() {
        let channel: NewChannel = serde_json::from_str(&channel_json("")).unwrap();
        assert_eq!(channel.video_duration, 60);
        assert_eq!(channel.privacy_status, "private");
        assert!(channel.keywords.is_empty());
        assert!(channel.validate().is_ok());
    }

    #[test]
    fn test_new_channel_validation() {
        let short: NewChannel =
            serde_json::from_str(&channel_json(r#", "video_duration": 10"#)).unwrap();
        assert!(matches!(short.validate(), Err(ShortsmithError::InvalidInput(_))));

        let secret: NewChannel =
            serde_json::from_str(&channel_json(r#", "privacy_status": "secret""#)).unwrap();
        assert!(secret.validate().is_err());

        let mut unnamed: NewChannel = serde_json::from_str(&channel_json("")).unwrap();
        unnamed.name = String::new();
        assert!(unnamed.validate().is_err());

        let mut long: NewChannel = serde_json::from_str(&channel_json("")).unwrap();
        long.topic = "가".repeat(500);
        assert!(long.validate().is_ok());
        long.topic.push('가');
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        assert!(ChannelUpdate::default().validate().is_ok());
        let update = ChannelUpdate {
            video_duration: Some(301),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_page_defaults() {
        let page = Page::new(None, None, 50);
        assert_eq!((page.skip, page.limit), (0, 50));
        let page = Page::new(Some(10), Some(5), 50);
        assert_eq!((page.skip, page.limit), (10, 5));
    }
}
