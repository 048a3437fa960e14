//! Generator configuration.
//!
//! Every field has a default, so an empty JSON object
//! (or no config file at all) yields a working setup.

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{AnimegenError, AnimegenResult};
use crate::render::raster::FontWeight;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SYSTEM_REGULAR: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const SYSTEM_BOLD: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Font files used by the CPU rasterizer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Regular-weight font file.
    pub regular: Option<PathBuf>,
    /// Bold-weight font file.
    pub bold: Option<PathBuf>,
    /// Probe well-known system font locations after the configured files.
    pub system_fallback: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: None,
            bold: None,
            system_fallback: true,
        }
    }
}

impl FontConfig {
    /// Candidate font files for `weight`, most preferred first.
    ///
    /// The other weight's files are appended as a last resort so a single configured font
    /// serves both weights.
    pub fn search_paths(&self, weight: FontWeight) -> Vec<PathBuf> {
        let (primary, secondary, sys_primary, sys_secondary) = match weight {
            FontWeight::Bold => (&self.bold, &self.regular, SYSTEM_BOLD, SYSTEM_REGULAR),
            FontWeight::Regular => (&self.regular, &self.bold, SYSTEM_REGULAR, SYSTEM_BOLD),
        };

        let mut out: Vec<PathBuf> = primary.iter().chain(secondary).cloned().collect();
        if self.system_fallback {
            out.extend(sys_primary.iter().chain(sys_secondary).map(PathBuf::from));
        }
        out
    }
}

/// Text sizes, offsets and colors for the placeholder overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Typography {
    /// Prompt line font size (bold).
    pub prompt_size_px: f32,
    /// Metadata lines font size (regular).
    pub meta_size_px: f32,
    /// Baseline offset of the style line below the canvas centre.
    pub style_line_offset_px: f32,
    /// Baseline offset of the timing line below the canvas centre.
    pub timing_line_offset_px: f32,
    /// Fill color for all text.
    pub text_color: Rgba8,
    /// Drop shadow color.
    pub shadow_color: Rgba8,
    /// Drop shadow blur in pixels.
    pub shadow_blur_px: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            prompt_size_px: 48.0,
            meta_size_px: 24.0,
            style_line_offset_px: 60.0,
            timing_line_offset_px: 100.0,
            text_color: Rgba8::WHITE,
            shadow_color: Rgba8::new(0, 0, 0, 204),
            shadow_blur_px: 10.0,
        }
    }
}

/// Top-level configuration for renderer and job timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Progress simulator cadence.
    pub tick_interval_ms: u64,
    /// Progress units added per tick.
    pub progress_step: u8,
    /// Simulated processing latency before the render runs.
    pub render_latency_ms: u64,
    /// Output canvas.
    pub canvas: Canvas,
    /// Font sources.
    pub fonts: FontConfig,
    /// Overlay typography.
    pub typography: Typography,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            progress_step: 1,
            render_latency_ms: 5000,
            canvas: Canvas::HD,
            fonts: FontConfig::default(),
            typography: Typography::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> AnimegenResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| AnimegenError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> AnimegenResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| AnimegenError::config(format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&s)
    }

    /// Reject settings that would stall or break a job.
    pub fn validate(&self) -> AnimegenResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(AnimegenError::config("tick_interval_ms must be > 0"));
        }
        if self.progress_step == 0 || self.progress_step > 100 {
            return Err(AnimegenError::config("progress_step must be within 1..=100"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(AnimegenError::config("canvas dimensions must be > 0"));
        }
        let t = &self.typography;
        for (name, v) in [
            ("prompt_size_px", t.prompt_size_px),
            ("meta_size_px", t.meta_size_px),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(AnimegenError::config(format!("{name} must be finite and > 0")));
            }
        }
        if !t.shadow_blur_px.is_finite() || t.shadow_blur_px < 0.0 {
            return Err(AnimegenError::config("shadow_blur_px must be finite and >= 0"));
        }
        Ok(())
    }

    /// Progress tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Simulated render latency.
    pub fn render_latency(&self) -> Duration {
        Duration::from_millis(self.render_latency_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
