//! The shared output area for generated audio, images and videos.

use crate::error::{Result, ShortsmithError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// A file written to the output area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub success: bool,
    pub filename: String,
    pub filepath: String,
    /// Size in bytes.
    pub size: u64,
}

/// A generated thumbnail together with the provider URL it was fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailArtifact {
    #[serde(flatten)]
    pub artifact: Artifact,
    pub url: String,
}

/// Last stamp handed out in this process.
static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Unix time in milliseconds, bumped so that each call returns a larger value.
fn unique_stamp() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut prev = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_STAMP.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}

/// Directory holding every generated artifact.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if needed. Safe to call concurrently.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Reserve a fresh `<prefix>_<ms>.<ext>` path without writing anything.
    pub fn reserve(&self, prefix: &str, ext: &str) -> Result<(String, PathBuf)> {
        self.ensure()?;
        let filename = format!("{}_{}.{}", prefix, unique_stamp(), ext);
        let path = self.root.join(&filename);
        Ok((filename, path))
    }

    /// Write `bytes` to a fresh `<prefix>_<ms>.<ext>` file.
    pub fn write(&self, prefix: &str, ext: &str, bytes: &[u8]) -> Result<Artifact> {
        let (filename, path) = self.reserve(prefix, ext)?;
        std::fs::write(&path, bytes)?;
        debug!("Wrote {} ({} bytes)", filename, bytes.len());
        Ok(Artifact {
            success: true,
            filename,
            filepath: path.to_string_lossy().into_owned(),
            size: bytes.len() as u64,
        })
    }

    /// Describe a file that something else already wrote into the area.
    pub fn describe(&self, filename: &str) -> Result<Artifact> {
        let path = self.resolve(filename)?;
        let size = std::fs::metadata(&path)?.len();
        Ok(Artifact {
            success: true,
            filename: filename.to_string(),
            filepath: path.to_string_lossy().into_owned(),
            size,
        })
    }

    /// Map a plain file name to its path inside the area.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let plain = !filename.is_empty()
            && filename != "."
            && !filename.contains("..")
            && !filename.contains('/')
            && !filename.contains('\\');
        if !plain {
            return Err(ShortsmithError::InvalidInput(format!(
                "Not a plain file name: {:?}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }
}

/// Content type served for an artifact, by extension.
pub fn content_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}
