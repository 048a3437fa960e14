use crate::config::FontConfig;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{AnimegenError, AnimegenResult};
use crate::foundation::math::{
    premul_over_in_place, tint_coverage_in_place, unpremultiply_in_place,
};
use crate::render::blur::{PixelRect, blur_region_in_place, shadow_kernel_params};
use crate::render::raster::{EncodedImage, FontWeight, LinearGradient, Rasterizer, TextRun};
use crate::render::text::{TextBrush, TextLayoutEngine, first_line_extent};
use std::collections::HashMap;
use std::io::Cursor;

/// PNG MIME type produced by [`CpuRasterizer::encode`].
pub const PNG_MIME: &str = "image/png";

/// One font per weight, each with its own layout engine so that regular and bold faces of the
/// same family never shadow each other.
struct FontSlot {
    engine: TextLayoutEngine,
    family: String,
    data: vello_cpu::peniko::FontData,
}

struct Target {
    width: u16,
    height: u16,
    /// Premultiplied RGBA8, row-major.
    data: Vec<u8>,
}

/// CPU implementation of [`Rasterizer`].
///
/// Gradients are computed per pixel, glyphs are shaped with parley and filled with `vello_cpu`,
/// shadows are a tinted, blurred copy of the glyph coverage. Output is PNG.
///
/// Fonts are resolved lazily on the first text draw; when no configured or system font can be
/// loaded, `draw_text` fails with [`AnimegenError::RenderUnavailable`].
pub struct CpuRasterizer {
    fonts: FontConfig,
    loaded: HashMap<FontWeight, FontSlot>,
    ctx: Option<(u16, u16, vello_cpu::RenderContext)>,
    target: Option<Target>,
}

impl CpuRasterizer {
    /// Create a rasterizer that resolves fonts from `fonts`.
    pub fn new(fonts: FontConfig) -> Self {
        Self {
            fonts,
            loaded: HashMap::new(),
            ctx: None,
            target: None,
        }
    }

    fn target_mut(&mut self) -> AnimegenResult<&mut Target> {
        self.target
            .as_mut()
            .ok_or_else(|| AnimegenError::render("draw called before begin"))
    }

    fn ensure_font(&mut self, weight: FontWeight) -> AnimegenResult<()> {
        if self.loaded.contains_key(&weight) {
            return Ok(());
        }

        let paths = self.fonts.search_paths(weight);
        for path in &paths {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            let mut engine = TextLayoutEngine::new();
            match engine.register_font(&bytes) {
                Ok(family) => {
                    tracing::debug!(path = %path.display(), ?weight, %family, "loaded font");
                    let data = vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(bytes),
                        0,
                    );
                    self.loaded.insert(
                        weight,
                        FontSlot {
                            engine,
                            family,
                            data,
                        },
                    );
                    return Ok(());
                }
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "font rejected");
                }
            }
        }

        Err(AnimegenError::render_unavailable(format!(
            "no usable {weight:?} font found (searched {} path(s))",
            paths.len()
        )))
    }
}

/// Fill the glyphs of `layout` into a fresh transparent premultiplied buffer.
fn rasterize_glyphs(
    ctx_slot: &mut Option<(u16, u16, vello_cpu::RenderContext)>,
    layout: &parley::Layout<TextBrush>,
    font: &vello_cpu::peniko::FontData,
    origin: (f64, f64),
    color: Rgba8,
    width: u16,
    height: u16,
) -> Vec<u8> {
    let mut ctx = match ctx_slot.take() {
        Some((w, h, ctx)) if w == width && h == height => ctx,
        _ => vello_cpu::RenderContext::new(width, height),
    };
    ctx.reset();
    ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    *ctx_slot = Some((width, height, ctx));
    pixmap.data_as_u8_slice().to_vec()
}

impl Rasterizer for CpuRasterizer {
    fn begin(&mut self, canvas: Canvas) -> AnimegenResult<()> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(AnimegenError::render_unavailable("canvas must be non-empty"));
        }
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| AnimegenError::render_unavailable("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| AnimegenError::render_unavailable("canvas height exceeds u16"))?;
        self.target = Some(Target {
            width,
            height,
            data: vec![0u8; canvas.rgba_len()],
        });
        Ok(())
    }

    fn paint_gradient(&mut self, gradient: &LinearGradient) -> AnimegenResult<()> {
        let target = self.target_mut()?;
        let (w, h) = (usize::from(target.width), usize::from(target.height));
        let start = gradient.stops.start;
        let end = gradient.stops.end;

        let dx = gradient.to.x - gradient.from.x;
        let dy = gradient.to.y - gradient.from.y;
        let len2 = dx * dx + dy * dy;

        let mut layer = vec![0u8; w * h * 4];
        for y in 0..h {
            let py = y as f64 + 0.5 - gradient.from.y;
            for x in 0..w {
                let px = x as f64 + 0.5 - gradient.from.x;
                let t = if len2 <= 0.0 {
                    0.0
                } else {
                    ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
                };
                let lerp = |a: u8, b: u8| -> u8 {
                    let af = f64::from(a);
                    let bf = f64::from(b);
                    (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
                };
                let c = Rgba8::new(
                    lerp(start.r, end.r),
                    lerp(start.g, end.g),
                    lerp(start.b, end.b),
                    lerp(start.a, end.a),
                );
                let idx = (y * w + x) * 4;
                layer[idx..idx + 4].copy_from_slice(&c.to_premul_array());
            }
        }
        premul_over_in_place(&mut target.data, &layer)
    }

    fn draw_text(&mut self, run: &TextRun) -> AnimegenResult<()> {
        let (width, height) = {
            let t = self.target_mut()?;
            (t.width, t.height)
        };
        if run.text.is_empty() {
            return Ok(());
        }

        self.ensure_font(run.weight)?;
        let Some(slot) = self.loaded.get_mut(&run.weight) else {
            return Err(AnimegenError::render("font slot missing after load"));
        };
        let layout = slot
            .engine
            .layout_line(&run.text, &slot.family, run.size_px)?;
        let Some(extent) = first_line_extent(&layout) else {
            return Ok(());
        };

        let origin_x = run.anchor.x - f64::from(extent.width) / 2.0;
        let origin_y = run.anchor.y - f64::from(extent.baseline);
        let coverage = rasterize_glyphs(
            &mut self.ctx,
            &layout,
            &slot.data,
            (origin_x, origin_y),
            run.color,
            width,
            height,
        );

        let target = self.target_mut()?;
        if let Some(shadow) = run.shadow
            && shadow.color.a > 0
        {
            let mut shade = coverage.clone();
            tint_coverage_in_place(&mut shade, shadow.color.to_premul_array());
            let (radius, sigma) = shadow_kernel_params(shadow.blur_px);
            let rect = PixelRect::padded(
                origin_x,
                run.anchor.y - f64::from(extent.ascent),
                origin_x + f64::from(extent.width),
                run.anchor.y + f64::from(extent.descent),
                radius,
                u32::from(width),
                u32::from(height),
            );
            blur_region_in_place(&mut shade, u32::from(width), rect, radius, sigma)?;
            premul_over_in_place(&mut target.data, &shade)?;
        }
        premul_over_in_place(&mut target.data, &coverage)
    }

    fn encode(&mut self) -> AnimegenResult<EncodedImage> {
        let target = self.target_mut()?;
        let (width, height) = (u32::from(target.width), u32::from(target.height));
        let mut rgba = target.data.clone();
        unpremultiply_in_place(&mut rgba);

        let img = image::RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| AnimegenError::encode("canvas buffer does not match dimensions"))?;
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| AnimegenError::encode(e.to_string()))?;

        Ok(EncodedImage {
            mime_type: PNG_MIME,
            width,
            height,
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
