//! Pipeline orchestrator for shortsmith.
//!
//! Coordinates the chain from topic search to the finished video, and records
//! workflow logs when a run is tied to a channel.

use crate::artifacts::{Artifact, OutputDir, ThumbnailArtifact};
use crate::config::{Prompts, Settings};
use crate::error::{Result, ShortsmithError};
use crate::llm::{OpenAITextGenerator, TextGenerator};
use crate::script::{GenerationMode, ScriptComposer, ScriptResult};
use crate::search::{SerpApiSearch, TopicSearch};
use crate::store::{Idea, NewIdea, NewVideo, NewWorkflowLog, RecordStore};
use crate::thumbnail::{download_image, DalleImageGenerator, ImageGenerator};
use crate::video::{FfmpegEncoder, VideoEncoder};
use crate::voice::{ElevenLabsSynthesizer, SpeechSynthesizer};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Upper bound on ideas requested in one brainstorm.
pub const MAX_IDEAS: usize = 10;

/// External providers used by the pipeline.
pub struct Providers {
    pub search: Arc<dyn TopicSearch>,
    pub generator: Arc<dyn TextGenerator>,
    pub voice: Arc<dyn SpeechSynthesizer>,
    pub images: Arc<dyn ImageGenerator>,
    pub encoder: Arc<dyn VideoEncoder>,
}

/// Everything produced by a complete run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResult {
    pub success: bool,
    pub script: ScriptResult,
    pub voice: Artifact,
    pub thumbnail: ThumbnailArtifact,
    pub video: Artifact,
    /// Id of the recorded video when the run was tied to a channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<i64>,
}

/// The main orchestrator for the shortsmith pipeline.
pub struct Orchestrator {
    search: Arc<dyn TopicSearch>,
    composer: ScriptComposer,
    voice: Arc<dyn SpeechSynthesizer>,
    images: Arc<dyn ImageGenerator>,
    encoder: Arc<dyn VideoEncoder>,
    output: OutputDir,
    store: Arc<RecordStore>,
    http: reqwest::Client,
}

impl Orchestrator {
    /// Create an orchestrator backed by the configured providers.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let openai_key = settings.openai_api_key();
        let providers = Providers {
            search: Arc::new(SerpApiSearch::new(settings.search.clone())),
            generator: Arc::new(OpenAITextGenerator::with_config(
                &settings.script,
                openai_key.as_deref(),
            )),
            voice: Arc::new(ElevenLabsSynthesizer::new(settings.voice.clone())),
            images: Arc::new(DalleImageGenerator::with_config(
                &settings.image,
                openai_key.as_deref(),
            )?),
            encoder: Arc::new(FfmpegEncoder::new(settings.video.clone())),
        };

        let store = Arc::new(RecordStore::open(&settings.sqlite_path())?);

        Self::with_components(&settings, prompts, providers, store)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: &Settings,
        prompts: Prompts,
        providers: Providers,
        store: Arc<RecordStore>,
    ) -> Result<Self> {
        let output = OutputDir::new(settings.output_dir());
        output.ensure()?;

        Ok(Self {
            search: providers.search,
            composer: ScriptComposer::new(
                providers.generator,
                prompts,
                settings.script.prompt_items,
                &settings.script.language,
            ),
            voice: providers.voice,
            images: providers.images,
            encoder: providers.encoder,
            output,
            store,
            http: reqwest::Client::new(),
        })
    }

    /// The record store shared with the admin surface.
    pub fn store(&self) -> Arc<RecordStore> {
        self.store.clone()
    }

    /// The output area artifacts are written to.
    pub fn output(&self) -> &OutputDir {
        &self.output
    }

    /// Search trending topics for `mode` and draft a script from them.
    #[instrument(skip(self))]
    pub async fn generate_script(&self, mode: GenerationMode) -> Result<ScriptResult> {
        let (news, videos) = match mode {
            GenerationMode::News => (self.news().await?, Vec::new()),
            GenerationMode::Youtube => (Vec::new(), self.trending_videos().await?),
            GenerationMode::Mixed => futures::try_join!(self.news(), self.trending_videos())?,
        };

        info!("Collected {} news items and {} videos", news.len(), videos.len());
        self.composer.compose(mode, &news, &videos).await
    }

    async fn news(&self) -> Result<Vec<crate::search::NewsArticle>> {
        self.search
            .news()
            .await
            .map_err(|e| e.context("News search failed"))
    }

    async fn trending_videos(&self) -> Result<Vec<crate::search::TrendingVideo>> {
        self.search
            .trending_videos()
            .await
            .map_err(|e| e.context("Video search failed"))
    }

    /// Synthesize narration for `script` into `voice_<ms>.mp3`.
    #[instrument(skip(self, script))]
    pub async fn generate_voice(&self, script: &str) -> Result<Artifact> {
        if script.trim().is_empty() {
            return Err(ShortsmithError::InvalidInput(
                "script must not be empty".to_string(),
            ));
        }

        let audio = self
            .voice
            .synthesize(script)
            .await
            .map_err(|e| e.context("Voice generation failed"))?;

        self.output.write("voice", "mp3", &audio)
    }

    /// Generate an image for `prompt` and save it as `thumbnail_<ms>.png`.
    #[instrument(skip(self, prompt))]
    pub async fn generate_thumbnail(&self, prompt: &str) -> Result<ThumbnailArtifact> {
        if prompt.trim().is_empty() {
            return Err(ShortsmithError::InvalidInput(
                "prompt must not be empty".to_string(),
            ));
        }

        let url = self
            .images
            .generate(prompt)
            .await
            .map_err(|e| e.context("Thumbnail generation failed"))?;

        let bytes = download_image(&self.http, &url)
            .await
            .map_err(|e| e.context("Thumbnail download failed"))?;

        let artifact = self.output.write("thumbnail", "png", &bytes)?;
        Ok(ThumbnailArtifact { artifact, url })
    }

    /// Mux a still image and a narration track into `shorts_<ms>.mp4`.
    #[instrument(skip(self))]
    pub async fn compose_video(&self, image: &Path, audio: &Path) -> Result<Artifact> {
        let (filename, path) = self.output.reserve("shorts", "mp4")?;

        self.encoder
            .encode(image, audio, &path)
            .await
            .map_err(|e| e.context("Video composition failed"))?;

        self.output.describe(&filename)
    }

    /// Run script, voice, thumbnail and video in sequence.
    ///
    /// With a `channel_id` every step is logged against the channel and the
    /// finished video is recorded.
    #[instrument(skip(self))]
    pub async fn generate_complete(
        &self,
        mode: GenerationMode,
        channel_id: Option<i64>,
    ) -> Result<CompleteResult> {
        if let Some(id) = channel_id {
            self.store.get_channel(id)?;
        }

        let script = self
            .tracked(channel_id, "script", self.generate_script(mode))
            .await?;
        let voice = self
            .tracked(channel_id, "voice", self.generate_voice(&script.script))
            .await?;
        let thumbnail = self
            .tracked(
                channel_id,
                "thumbnail",
                self.generate_thumbnail(&script.image_prompt),
            )
            .await?;
        let video = self
            .tracked(
                channel_id,
                "video",
                self.compose_video(
                    Path::new(&thumbnail.artifact.filepath),
                    Path::new(&voice.filepath),
                ),
            )
            .await?;

        let video_id = match channel_id {
            Some(id) => Some(self.record_video(id, &script, &voice, &thumbnail, &video)?),
            None => None,
        };

        info!("Complete run finished: {}", video.filename);
        Ok(CompleteResult {
            success: true,
            script,
            voice,
            thumbnail,
            video,
            video_id,
        })
    }

    /// Brainstorm `count` ideas for a channel and store them as pending.
    ///
    /// A completion that is not a JSON list of ideas stores nothing.
    #[instrument(skip(self))]
    pub async fn generate_ideas(&self, channel_id: i64, count: usize) -> Result<Vec<Idea>> {
        if count == 0 || count > MAX_IDEAS {
            return Err(ShortsmithError::InvalidInput(format!(
                "num_ideas must be between 1 and {}",
                MAX_IDEAS
            )));
        }
        let channel = self.store.get_channel(channel_id)?;

        let drafts = self
            .tracked(
                Some(channel_id),
                "idea_generation",
                self.composer.brainstorm(&channel, count),
            )
            .await?;

        let mut ideas = Vec::with_capacity(drafts.len());
        for draft in drafts {
            if draft.title.trim().is_empty() {
                warn!("Skipping brainstormed idea without a title");
                continue;
            }
            ideas.push(self.store.create_idea(NewIdea {
                channel_id,
                title: draft.title,
                hook: draft.hook,
                content: draft.content,
                cta: draft.cta,
                keywords: draft.keywords,
            })?);
        }

        info!("Stored {} ideas for channel {}", ideas.len(), channel_id);
        Ok(ideas)
    }

    /// Await a step, logging start and outcome when tied to a channel.
    async fn tracked<T, F>(&self, channel_id: Option<i64>, step: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let Some(channel_id) = channel_id else {
            return fut.await;
        };

        self.store.append_log(NewWorkflowLog {
            channel_id,
            step: step.to_string(),
            status: "started".to_string(),
            ..Default::default()
        })?;

        let started = Instant::now();
        let result = fut.await;
        let elapsed = started.elapsed().as_millis() as i64;

        let log = match &result {
            Ok(_) => NewWorkflowLog {
                channel_id,
                step: step.to_string(),
                status: "completed".to_string(),
                message: Some(format!("{} finished", step)),
                execution_ms: Some(elapsed),
                ..Default::default()
            },
            Err(e) => NewWorkflowLog {
                channel_id,
                step: step.to_string(),
                status: "failed".to_string(),
                error: Some(e.to_string()),
                execution_ms: Some(elapsed),
                ..Default::default()
            },
        };

        if let Err(e) = self.store.append_log(log) {
            warn!("Failed to record {} step outcome: {}", step, e);
        }
        result
    }

    fn record_video(
        &self,
        channel_id: i64,
        script: &ScriptResult,
        voice: &Artifact,
        thumbnail: &ThumbnailArtifact,
        video: &Artifact,
    ) -> Result<i64> {
        let title = script
            .titles
            .first()
            .cloned()
            .unwrap_or_else(|| format!("Shorts {}", video.filename));

        let record = self.store.create_video(NewVideo {
            channel_id,
            idea_id: None,
            title,
            description: Some(script.script.clone()),
            audio_path: Some(voice.filepath.clone()),
            thumbnail_path: Some(thumbnail.artifact.filepath.clone()),
            video_path: Some(video.filepath.clone()),
            file_size: Some(video.size as i64),
            status: "completed".to_string(),
        })?;
        self.store.increment_total_videos(channel_id)?;
        self.store.append_log(NewWorkflowLog {
            channel_id,
            video_id: Some(record.id),
            step: "record".to_string(),
            status: "completed".to_string(),
            message: Some(format!("Saved video {}", record.title)),
            ..Default::default()
        })?;

        Ok(record.id)
    }
}
