//! Topic search for trending news and videos.

mod serpapi;

pub use serpapi::SerpApiSearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A news article returned by topic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub snippet: String,
    pub source: String,
    pub link: String,
    pub date: String,
}

/// A trending video returned by topic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingVideo {
    pub title: String,
    pub link: String,
    pub channel: String,
    pub views: u64,
    pub published_time: String,
    pub length: String,
}

/// Trait for topic search providers.
#[async_trait]
pub trait TopicSearch: Send + Sync {
    /// Top news articles for the configured query and locale.
    async fn news(&self) -> Result<Vec<NewsArticle>>;

    /// Top trending videos for the configured query and locale.
    async fn trending_videos(&self) -> Result<Vec<TrendingVideo>>;
}
