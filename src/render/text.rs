use crate::foundation::error::{AnimegenError, AnimegenResult};

/// Brush payload carried through parley layouts. Color is applied at raster time, so this is
/// only a marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush;

/// Horizontal and vertical extent of a single laid-out line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LineExtent {
    /// Advance width of the line.
    pub(crate) width: f32,
    /// Baseline offset from the top of the layout.
    pub(crate) baseline: f32,
    /// Distance from baseline to the top of the tallest glyph box.
    pub(crate) ascent: f32,
    /// Distance from baseline to the bottom of the lowest glyph box.
    pub(crate) descent: f32,
}

/// Thin wrapper over parley's font and layout contexts.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes and return the family name to lay out with.
    pub(crate) fn register_font(&mut self, font_bytes: &[u8]) -> AnimegenResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            AnimegenError::render_unavailable("no font families registered from font bytes")
        })?;

        Ok(self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AnimegenError::render_unavailable("registered font family has no name"))?
            .to_string())
    }

    /// Shape `text` as a single unwrapped line. Line breaks and other whitespace become
    /// spaces.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
    ) -> AnimegenResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AnimegenError::render("text size_px must be finite and > 0"));
        }

        let text = single_line(text);
        let text = text.as_str();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Extent of the first line, or `None` for layouts without lines.
pub(crate) fn first_line_extent(layout: &parley::Layout<TextBrush>) -> Option<LineExtent> {
    let line = layout.lines().next()?;
    let m = line.metrics();
    Some(LineExtent {
        width: layout.width(),
        baseline: m.baseline,
        ascent: m.ascent,
        descent: m.descent,
    })
}

/// Replace every whitespace character with U+0020 so shaping never produces a second line.
pub(crate) fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
