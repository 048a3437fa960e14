use crate::foundation::core::{ClipDuration, FrameRate};
use crate::foundation::error::{AnimegenError, AnimegenResult};
use crate::render::raster::EncodedImage;
use base64::Engine as _;
use std::path::Path;

/// File name offered when the artifact is downloaded.
pub const DOWNLOAD_FILE_NAME: &str = "anime-video.png";

/// Metrics derived from the requested clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ArtifactMetrics {
    /// Clip duration in seconds.
    pub duration_secs: u32,
    /// Frames per second.
    pub fps: u32,
    /// `duration_secs * fps`.
    pub total_frames: u32,
}

impl ArtifactMetrics {
    /// Derive metrics from a validated duration and frame rate.
    pub fn new(duration: ClipDuration, fps: FrameRate) -> Self {
        let duration_secs = duration.secs();
        let fps = fps.get();
        Self {
            duration_secs,
            fps,
            total_frames: duration_secs * fps,
        }
    }

    /// `"{duration}s @ {fps}fps"`.
    pub fn timing_label(&self) -> String {
        format!("{}s @ {}fps", self.duration_secs, self.fps)
    }
}

/// The three text lines painted over the gradient.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OverlayText {
    /// Prompt as entered.
    pub prompt: String,
    /// `"Style: {display name}"`.
    pub style_line: String,
    /// `"{duration}s @ {fps}fps"`.
    pub timing_line: String,
}

/// Placeholder output of a completed job: one encoded still image plus derived metrics.
///
/// An artifact is either fully produced or absent; there is no partial state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    image: EncodedImage,
    metrics: ArtifactMetrics,
    style_id: String,
    overlay: OverlayText,
}

impl Artifact {
    pub(crate) fn new(
        image: EncodedImage,
        metrics: ArtifactMetrics,
        style_id: impl Into<String>,
        overlay: OverlayText,
    ) -> Self {
        Self {
            image,
            metrics,
            style_id: style_id.into(),
            overlay,
        }
    }

    /// Encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.image.bytes
    }

    /// MIME type of [`Artifact::bytes`].
    pub fn mime_type(&self) -> &'static str {
        self.image.mime_type
    }

    /// Image dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// Derived clip metrics.
    pub fn metrics(&self) -> ArtifactMetrics {
        self.metrics
    }

    /// Id of the style whose treatment was painted (the fallback's id for unknown styles).
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    /// Text painted over the gradient.
    pub fn overlay(&self) -> &OverlayText {
        &self.overlay
    }

    /// `data:<mime>;base64,<payload>` URI for the encoded image.
    pub fn to_data_uri(&self) -> String {
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.image.bytes);
        format!("data:{};base64,{payload}", self.image.mime_type)
    }

    /// Suggested download file name.
    pub fn suggested_file_name(&self) -> &'static str {
        DOWNLOAD_FILE_NAME
    }

    /// Write the encoded image to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> AnimegenResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AnimegenError::Other(
                    anyhow::Error::new(e)
                        .context(format!("create output dir '{}'", parent.display())),
                )
            })?;
        }
        std::fs::write(path, &self.image.bytes).map_err(|e| {
            AnimegenError::Other(
                anyhow::Error::new(e).context(format!("write artifact '{}'", path.display())),
            )
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/artifact.rs"]
mod tests;
