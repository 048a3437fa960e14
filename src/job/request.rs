use crate::foundation::core::{ClipDuration, FrameRate};
use crate::foundation::error::AnimegenResult;
use crate::render::artifact::ArtifactMetrics;

/// Style preselected by the generator form.
pub const DEFAULT_STYLE_ID: &str = "shonen";

/// Parameters for one generation job, built fresh from the current inputs when a job starts.
///
/// Duration and frame rate are validated on construction. The prompt is not: a blank prompt is
/// a soft failure handled by the job controller, which ignores such requests.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerationRequest {
    prompt: String,
    style_id: String,
    duration: ClipDuration,
    fps: FrameRate,
}

impl GenerationRequest {
    /// Build a request from raw inputs.
    pub fn new(
        prompt: impl Into<String>,
        style_id: impl Into<String>,
        duration_secs: u32,
        fps: u32,
    ) -> AnimegenResult<Self> {
        Ok(Self {
            prompt: prompt.into(),
            style_id: style_id.into(),
            duration: ClipDuration::from_secs(duration_secs)?,
            fps: FrameRate::new(fps)?,
        })
    }

    /// Request with the form defaults: `shonen`, 5 s, 24 fps.
    pub fn with_defaults(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style_id: DEFAULT_STYLE_ID.to_string(),
            duration: ClipDuration::default(),
            fps: FrameRate::default(),
        }
    }

    /// Prompt text exactly as entered.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Requested style id (may be unknown to the catalog).
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    /// Requested clip duration.
    pub fn duration(&self) -> ClipDuration {
        self.duration
    }

    /// Requested frame rate.
    pub fn fps(&self) -> FrameRate {
        self.fps
    }

    /// `true` when the prompt is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.prompt.trim().is_empty()
    }

    /// Duration, frame rate and total frame count derived from this request.
    pub fn metrics(&self) -> ArtifactMetrics {
        ArtifactMetrics::new(self.duration, self.fps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/request.rs"]
mod tests;
