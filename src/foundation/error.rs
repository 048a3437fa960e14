/// Convenience result type used across animegen.
pub type AnimegenResult<T> = Result<T, AnimegenError>;

/// Top-level error taxonomy used by library APIs.
///
/// Soft outcomes (blank prompt, `start` while a job is running, `reset` while idle) are not
/// errors; they are reported through [`crate::StartOutcome`] and plain return values instead.
#[derive(thiserror::Error, Debug)]
pub enum AnimegenError {
    /// A value the shell is never expected to produce (out-of-range duration, unsupported fps).
    #[error("validation error: {0}")]
    Validation(String),

    /// The rasterization capability cannot produce an artifact (e.g. no usable font).
    #[error("render unavailable: {0}")]
    RenderUnavailable(String),

    /// Rasterization started but failed mid-draw.
    #[error("render error: {0}")]
    Render(String),

    /// The finished canvas could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnimegenError {
    /// Build a [`AnimegenError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AnimegenError::RenderUnavailable`].
    pub fn render_unavailable(msg: impl Into<String>) -> Self {
        Self::RenderUnavailable(msg.into())
    }

    /// Build a [`AnimegenError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`AnimegenError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`AnimegenError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Return `true` for failures that end a job attempt because the raster capability is
    /// missing, as opposed to a bug in a draw call.
    pub fn is_render_unavailable(&self) -> bool {
        matches!(self, Self::RenderUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
