#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Prompt-to-anime-clip generator with a placeholder backend.
//!
//! A [`JobController`] accepts one [`GenerationRequest`] at a time, paces cosmetic progress
//! with a [`ProgressSimulator`], waits out a fixed render latency, and then asks the
//! [`PlaceholderRenderer`] for an [`Artifact`]: a 1280x720 PNG with the style gradient and the
//! prompt overlaid.

pub mod config;
mod foundation;
mod job;
mod render;
mod style;

pub use config::{FontConfig, GeneratorConfig, Typography};
pub use foundation::core::{Canvas, ClipDuration, FrameRate, Point, Rgba8};
pub use foundation::error::{AnimegenError, AnimegenResult};
pub use job::controller::{JobController, JobEvent, JobState, StartOutcome};
pub use job::progress::{PROGRESS_MAX, ProgressHandle, ProgressSimulator};
pub use job::request::{DEFAULT_STYLE_ID, GenerationRequest};
pub use render::artifact::{Artifact, ArtifactMetrics, DOWNLOAD_FILE_NAME, OverlayText};
pub use render::cpu::{CpuRasterizer, PNG_MIME};
pub use render::placeholder::{PlaceholderRenderer, overlay_text};
pub use render::raster::{
    DropShadow, EncodedImage, FontWeight, LinearGradient, RasterKind, Rasterizer, TextRun,
    create_rasterizer,
};
pub use style::catalog::{ColorStops, StyleCatalog, StyleDefinition};
pub use style::color::parse_hex;
