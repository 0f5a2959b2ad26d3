//! ffmpeg-based video encoding.
//!
//! The still image is looped for the length of the audio track, scaled to fit
//! the configured frame and padded to exactly that size.

use super::VideoEncoder;
use crate::config::VideoSettings;
use crate::error::{Result, ShortsmithError};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Encoder that shells out to the ffmpeg binary.
pub struct FfmpegEncoder {
    settings: VideoSettings,
}

impl FfmpegEncoder {
    pub fn new(settings: VideoSettings) -> Self {
        Self { settings }
    }

    /// Scale-and-pad filter for the configured frame size.
    fn filter(&self) -> String {
        let (w, h) = (self.settings.width, self.settings.height);
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1"
        )
    }

    fn args(&self, image: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let filter = self.filter();
        let max_seconds = self.settings.max_seconds.to_string();

        let mut args: Vec<OsString> = vec!["-loop".into(), "1".into(), "-i".into()];
        args.push(image.as_os_str().to_owned());
        args.push("-i".into());
        args.push(audio.as_os_str().to_owned());

        let encoding: [&str; 16] = [
            "-c:v",
            "libx264",
            "-tune",
            "stillimage",
            "-c:a",
            "aac",
            "-b:a",
            self.settings.audio_bitrate.as_str(),
            "-pix_fmt",
            "yuv420p",
            "-vf",
            filter.as_str(),
            "-shortest",
            "-t",
            max_seconds.as_str(),
            "-y",
        ];
        args.extend(encoding.into_iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    #[instrument(skip(self), fields(output = %output.display()))]
    async fn encode(&self, image: &Path, audio: &Path, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Encoding video");
        let result = Command::new(&self.settings.ffmpeg)
            .args(self.args(image, audio, output))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => {
                debug!("ffmpeg finished");
                Ok(())
            }
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                Err(ShortsmithError::ToolFailed(format!("ffmpeg failed: {err}")))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ShortsmithError::ToolNotFound(self.settings.ffmpeg.clone()))
            }
            Err(e) => Err(ShortsmithError::ToolFailed(format!("ffmpeg error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_layout() {
        let encoder = FfmpegEncoder::new(VideoSettings::default());
        let args: Vec<String> = encoder
            .args(Path::new("a.png"), Path::new("b.mp3"), Path::new("c.mp4"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "-loop", "1", "-i", "a.png", "-i", "b.mp3", "-c:v", "libx264", "-tune",
                "stillimage", "-c:a", "aac", "-b:a", "192k", "-pix_fmt", "yuv420p", "-vf",
                "scale=1080:1920:force_original_aspect_ratio=decrease,pad=1080:1920:(ow-iw)/2:(oh-ih)/2,setsar=1",
                "-shortest", "-t", "60", "-y", "c.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_tool_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = FfmpegEncoder::new(VideoSettings {
            ffmpeg: "shortsmith-no-such-ffmpeg".to_string(),
            ..Default::default()
        });

        let err = encoder
            .encode(
                &dir.path().join("a.png"),
                &dir.path().join("b.mp3"),
                &dir.path().join("out/c.mp4"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShortsmithError::ToolNotFound(ref name) if name == "shortsmith-no-such-ffmpeg"));
    }
}
