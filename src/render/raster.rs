use crate::config::FontConfig;
use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::AnimegenResult;
use crate::style::catalog::ColorStops;

/// Linear gradient between two points in canvas pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    /// Point where `stops.start` applies.
    pub from: Point,
    /// Point where `stops.end` applies.
    pub to: Point,
    /// Ordered color stops.
    pub stops: ColorStops,
}

impl LinearGradient {
    /// Gradient across the canvas diagonal, origin to opposite corner.
    pub fn diagonal(canvas: Canvas, stops: ColorStops) -> Self {
        Self {
            from: Point::ZERO,
            to: Point::new(f64::from(canvas.width), f64::from(canvas.height)),
            stops,
        }
    }
}

/// Font weight requested for a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Regular weight.
    Regular,
    /// Bold weight.
    Bold,
}

/// Blurred, unoffset shadow drawn beneath a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropShadow {
    /// Shadow color (alpha included).
    pub color: Rgba8,
    /// Blur extent in pixels, as in a 2D canvas `shadowBlur`.
    pub blur_px: f32,
}

/// One line of text, horizontally centered on `anchor.x` with its alphabetic baseline on
/// `anchor.y`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Text to draw. Not wrapped.
    pub text: String,
    /// Center-x / baseline-y anchor.
    pub anchor: Point,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Fill color.
    pub color: Rgba8,
    /// Optional drop shadow.
    pub shadow: Option<DropShadow>,
}

/// Encoded still image produced by [`Rasterizer::encode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Encoded byte stream.
    pub bytes: Vec<u8>,
}

/// 2D rasterization capability used by the placeholder renderer.
///
/// Call order per image: `begin`, any number of `paint_gradient` / `draw_text`, then `encode`.
/// Implementations must be deterministic: the same call sequence yields byte-identical output.
pub trait Rasterizer: Send {
    /// Allocate a transparent canvas, discarding any previous one.
    fn begin(&mut self, canvas: Canvas) -> AnimegenResult<()>;
    /// Fill the whole canvas with a linear gradient.
    fn paint_gradient(&mut self, gradient: &LinearGradient) -> AnimegenResult<()>;
    /// Draw one centered text run.
    fn draw_text(&mut self, run: &TextRun) -> AnimegenResult<()>;
    /// Encode the canvas as a lossless still image.
    fn encode(&mut self) -> AnimegenResult<EncodedImage>;
}

/// Available rasterizer kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RasterKind {
    /// CPU rasterizer powered by `vello_cpu` and `parley`.
    #[default]
    Cpu,
}

/// Create a rasterizer implementation.
pub fn create_rasterizer(kind: RasterKind, fonts: &FontConfig) -> Box<dyn Rasterizer> {
    match kind {
        RasterKind::Cpu => Box::new(crate::render::cpu::CpuRasterizer::new(fonts.clone())),
    }
}
