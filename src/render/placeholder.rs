use crate::config::{GeneratorConfig, Typography};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::AnimegenResult;
use crate::job::request::GenerationRequest;
use crate::render::artifact::{Artifact, OverlayText};
use crate::render::raster::{
    DropShadow, FontWeight, LinearGradient, RasterKind, Rasterizer, TextRun, create_rasterizer,
};
use crate::style::catalog::{StyleCatalog, StyleDefinition};

/// Stand-in rendering backend: paints the style gradient and overlays the prompt and clip
/// metadata, producing a single still image instead of a video.
///
/// For a fixed rasterizer, `render` is a pure function of the request.
pub struct PlaceholderRenderer {
    catalog: StyleCatalog,
    canvas: Canvas,
    typography: Typography,
    raster: Box<dyn Rasterizer>,
}

impl PlaceholderRenderer {
    /// Assemble a renderer from explicit parts.
    pub fn new(
        catalog: StyleCatalog,
        canvas: Canvas,
        typography: Typography,
        raster: Box<dyn Rasterizer>,
    ) -> Self {
        Self {
            catalog,
            canvas,
            typography,
            raster,
        }
    }

    /// Renderer using the CPU rasterizer configured by `cfg`.
    pub fn from_config(cfg: &GeneratorConfig, catalog: StyleCatalog) -> Self {
        Self::new(
            catalog,
            cfg.canvas,
            cfg.typography.clone(),
            create_rasterizer(RasterKind::Cpu, &cfg.fonts),
        )
    }

    /// Style table used for lookups.
    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Render the placeholder artifact for `request`.
    #[tracing::instrument(
        skip(self, request),
        fields(
            style = request.style_id(),
            duration = request.duration().secs(),
            fps = request.fps().get()
        )
    )]
    pub fn render(&mut self, request: &GenerationRequest) -> AnimegenResult<Artifact> {
        let style = *self.catalog.lookup(request.style_id());
        if style.id != request.style_id() {
            tracing::debug!(fallback = style.id, "unknown style, using fallback treatment");
        }
        let metrics = request.metrics();
        let overlay = overlay_text(&style, request);

        self.raster.begin(self.canvas)?;
        self.raster
            .paint_gradient(&LinearGradient::diagonal(self.canvas, style.color_stops))?;

        let t = &self.typography;
        let center = self.canvas.center();
        let shadow = Some(DropShadow {
            color: t.shadow_color,
            blur_px: t.shadow_blur_px,
        });
        let lines = [
            (&overlay.prompt, t.prompt_size_px, FontWeight::Bold, 0.0),
            (
                &overlay.style_line,
                t.meta_size_px,
                FontWeight::Regular,
                t.style_line_offset_px,
            ),
            (
                &overlay.timing_line,
                t.meta_size_px,
                FontWeight::Regular,
                t.timing_line_offset_px,
            ),
        ];
        for (text, size_px, weight, dy) in lines {
            self.raster.draw_text(&TextRun {
                text: text.clone(),
                anchor: Point::new(center.x, center.y + f64::from(dy)),
                size_px,
                weight,
                color: t.text_color,
                shadow,
            })?;
        }

        let image = self.raster.encode()?;
        tracing::debug!(bytes = image.bytes.len(), "placeholder encoded");
        Ok(Artifact::new(image, metrics, style.id, overlay))
    }
}

/// Text lines painted for `request` with the resolved `style`.
pub fn overlay_text(style: &StyleDefinition, request: &GenerationRequest) -> OverlayText {
    OverlayText {
        prompt: request.prompt().to_string(),
        style_line: format!("Style: {}", style.display_name),
        timing_line: request.metrics().timing_label(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/placeholder.rs"]
mod tests;
