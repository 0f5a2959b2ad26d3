//! SerpAPI implementation of topic search.

use super::{NewsArticle, TopicSearch, TrendingVideo};
use crate::config::SearchSettings;
use crate::error::{Result, ShortsmithError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

const UNKNOWN_SOURCE: &str = "Unknown";

/// Topic search backed by SerpAPI's Google News and YouTube engines.
pub struct SerpApiSearch {
    client: reqwest::Client,
    settings: SearchSettings,
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news_results: Vec<NewsResult>,
}

#[derive(Deserialize)]
struct NewsResult {
    title: Option<String>,
    snippet: Option<String>,
    source: Option<NamedEntity>,
    link: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct VideoResponse {
    #[serde(default)]
    video_results: Vec<VideoResult>,
}

#[derive(Deserialize)]
struct VideoResult {
    title: Option<String>,
    link: Option<String>,
    channel: Option<NamedEntity>,
    views: Option<serde_json::Value>,
    #[serde(alias = "published_date")]
    published_time: Option<String>,
    length: Option<String>,
}

#[derive(Deserialize)]
struct NamedEntity {
    name: Option<String>,
}

impl NamedEntity {
    fn into_name(entity: Option<NamedEntity>) -> String {
        entity
            .and_then(|e| e.name)
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    }
}

impl SerpApiSearch {
    /// Create a search client from settings.
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// Build the request URL for an engine with its query parameter.
    fn request_url(&self, engine: &str, query_param: &str, query: &str) -> Result<url::Url> {
        let api_key = self.settings.api_key()?;
        url::Url::parse_with_params(
            &self.settings.base_url,
            &[
                ("engine", engine),
                (query_param, query),
                ("gl", self.settings.country.as_str()),
                ("hl", self.settings.language.as_str()),
                ("api_key", api_key.as_str()),
            ],
        )
        .map_err(|e| ShortsmithError::Config(format!("Invalid search URL: {}", e)))
    }

    async fn fetch(&self, url: url::Url) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ShortsmithError::Upstream(format!(
                "SerpAPI returned {}: {}",
                status, body
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl TopicSearch for SerpApiSearch {
    #[instrument(skip(self))]
    async fn news(&self) -> Result<Vec<NewsArticle>> {
        let url = self.request_url("google_news", "q", &self.settings.news_query)?;
        let body = self.fetch(url).await?;
        let parsed: NewsResponse = serde_json::from_str(&body)?;

        if parsed.news_results.is_empty() {
            warn!("SerpAPI returned no news results: {}", body);
            return Ok(Vec::new());
        }

        let articles: Vec<NewsArticle> = parsed
            .news_results
            .into_iter()
            .take(self.settings.top_n)
            .map(|n| NewsArticle {
                title: n.title.unwrap_or_default(),
                snippet: n.snippet.unwrap_or_default(),
                source: NamedEntity::into_name(n.source),
                link: n.link.unwrap_or_default(),
                date: n.date.unwrap_or_default(),
            })
            .collect();

        debug!("Fetched {} news articles", articles.len());
        Ok(articles)
    }

    #[instrument(skip(self))]
    async fn trending_videos(&self) -> Result<Vec<TrendingVideo>> {
        let url = self.request_url("youtube", "search_query", &self.settings.video_query)?;
        let body = self.fetch(url).await?;
        let parsed: VideoResponse = serde_json::from_str(&body)?;

        if parsed.video_results.is_empty() {
            warn!("SerpAPI returned no video results: {}", body);
            return Ok(Vec::new());
        }

        let videos: Vec<TrendingVideo> = parsed
            .video_results
            .into_iter()
            .take(self.settings.top_n)
            .map(|v| TrendingVideo {
                title: v.title.unwrap_or_default(),
                link: v.link.unwrap_or_default(),
                channel: NamedEntity::into_name(v.channel),
                views: v.views.as_ref().and_then(serde_json::Value::as_u64).unwrap_or(0),
                published_time: v.published_time.unwrap_or_default(),
                length: v.length.unwrap_or_default(),
            })
            .collect();

        debug!("Fetched {} trending videos", videos.len());
        Ok(videos)
    }
}
