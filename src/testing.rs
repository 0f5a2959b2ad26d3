//! Provider doubles shared by the pipeline and router tests.

use crate::error::{Result, ShortsmithError};
use crate::llm::TextGenerator;
use crate::orchestrator::Providers;
use crate::search::{NewsArticle, TopicSearch, TrendingVideo};
use crate::thumbnail::ImageGenerator;
use crate::video::VideoEncoder;
use crate::voice::SpeechSynthesizer;
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPLETION: &str =
    "[SCRIPT]\nBig news today\n[TITLES]\n1. Headline\n[THUMBNAILS]\n1. WOW\n[IMAGE_PROMPT]\nnewsroom at night";

pub const IMAGE_BYTES: &[u8] = b"PNGDATA";
pub const AUDIO_BYTES: &[u8] = b"ID3audio";

/// Call counters for each provider.
#[derive(Default)]
pub struct Calls {
    pub news: AtomicUsize,
    pub videos: AtomicUsize,
    pub generate: AtomicUsize,
    pub voice: AtomicUsize,
}

pub struct FakeSearch(pub Arc<Calls>);

#[async_trait]
impl TopicSearch for FakeSearch {
    async fn news(&self) -> Result<Vec<NewsArticle>> {
        self.0.news.fetch_add(1, Ordering::SeqCst);
        Ok(vec![NewsArticle {
            title: "Story".into(),
            snippet: "Details".into(),
            source: "Wire".into(),
            link: "https://news/1".into(),
            date: "today".into(),
        }])
    }

    async fn trending_videos(&self) -> Result<Vec<TrendingVideo>> {
        self.0.videos.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// News succeeds with nothing, video search fails.
pub struct FailingSearch;

#[async_trait]
impl TopicSearch for FailingSearch {
    async fn news(&self) -> Result<Vec<NewsArticle>> {
        Ok(Vec::new())
    }

    async fn trending_videos(&self) -> Result<Vec<TrendingVideo>> {
        Err(ShortsmithError::Upstream("quota exceeded".into()))
    }
}

pub fn failing_search() -> Arc<dyn TopicSearch> {
    Arc::new(FailingSearch)
}

pub struct FakeGenerator(pub Arc<Calls>);

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
        self.0.generate.fetch_add(1, Ordering::SeqCst);
        Ok(COMPLETION.to_string())
    }
}

/// Replies with a fixed completion and remembers the last prompt pair.
pub struct FixedGenerator {
    reply: String,
    seen: Mutex<Option<(String, String)>>,
}

impl FixedGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(None),
        }
    }

    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        *self.seen.lock().unwrap() = Some((system.to_string(), user.to_string()));
        Ok(self.reply.clone())
    }
}

pub struct FakeVoice(pub Arc<Calls>);

#[async_trait]
impl SpeechSynthesizer for FakeVoice {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        self.0.voice.fetch_add(1, Ordering::SeqCst);
        Ok(AUDIO_BYTES.to_vec())
    }
}

pub struct FakeImages(pub String);

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Writes the image bytes followed by the audio bytes.
pub struct FakeEncoder;

#[async_trait]
impl VideoEncoder for FakeEncoder {
    async fn encode(&self, image: &Path, audio: &Path, output: &Path) -> Result<()> {
        let mut bytes = std::fs::read(image)?;
        bytes.extend(std::fs::read(audio)?);
        std::fs::write(output, bytes)?;
        Ok(())
    }
}

/// Serves `IMAGE_BYTES` for any GET.
pub async fn image_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .mount(&server)
        .await;
    server
}

/// Fake providers; `search` replaces the default counting search when given.
pub fn providers(
    calls: &Arc<Calls>,
    server: &MockServer,
    search: Option<Arc<dyn TopicSearch>>,
) -> Providers {
    Providers {
        search: match search {
            Some(search) => search,
            None => Arc::new(FakeSearch(calls.clone())),
        },
        generator: Arc::new(FakeGenerator(calls.clone())),
        voice: Arc::new(FakeVoice(calls.clone())),
        images: Arc::new(FakeImages(format!("{}/image.png", server.uri()))),
        encoder: Arc::new(FakeEncoder),
    }
}
