use crate::foundation::core::Rgba8;
use crate::style::color::hex_rgb;

/// Ordered two-stop color treatment for a style's gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ColorStops {
    /// Color at the canvas origin (top-left).
    pub start: Rgba8,
    /// Color at the opposite corner (bottom-right).
    pub end: Rgba8,
}

/// Display metadata and rendering treatment for one style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StyleDefinition {
    /// Stable identifier, e.g. `"cyberpunk"`.
    pub id: &'static str,
    /// Human-readable name, e.g. `"Cyberpunk"`.
    pub display_name: &'static str,
    /// One-line description shown next to the name.
    pub description: &'static str,
    /// Gradient treatment.
    pub color_stops: ColorStops,
}

const fn style(
    id: &'static str,
    display_name: &'static str,
    description: &'static str,
    start: u32,
    end: u32,
) -> StyleDefinition {
    StyleDefinition {
        id,
        display_name,
        description,
        color_stops: ColorStops {
            start: hex_rgb(start),
            end: hex_rgb(end),
        },
    }
}

const BUILTIN: [StyleDefinition; 6] = [
    style(
        "shonen",
        "Shonen",
        "Action-packed, vibrant colors",
        0xFF6B6B,
        0x4ECDC4,
    ),
    style(
        "shoujo",
        "Shoujo",
        "Romantic, soft pastels",
        0xFFB6D9,
        0xD4A5FF,
    ),
    style(
        "cyberpunk",
        "Cyberpunk",
        "Neon lights, futuristic",
        0x0D1B2A,
        0xFF006E,
    ),
    style(
        "studio-ghibli",
        "Studio Ghibli",
        "Whimsical, detailed",
        0x88D498,
        0x87CEEB,
    ),
    style(
        "seinen",
        "Seinen",
        "Dark, mature themes",
        0x2C3E50,
        0x8B0000,
    ),
    style(
        "chibi",
        "Chibi",
        "Cute, exaggerated features",
        0xFFC0CB,
        0xFFE4E1,
    ),
];

/// Index of the entry used when a lookup misses.
const FALLBACK_IDX: usize = 5;

/// Fixed, read-only table of styles.
///
/// The table always contains a fallback entry, so [`StyleCatalog::lookup`] never leaves the
/// renderer without color stops.
#[derive(Clone, Debug)]
pub struct StyleCatalog {
    entries: Vec<StyleDefinition>,
    fallback: usize,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleCatalog {
    /// The six built-in styles, with `chibi` as fallback.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.to_vec(),
            fallback: FALLBACK_IDX,
        }
    }

    /// Append an entry. An existing entry with the same id is replaced in place.
    pub fn with_style(mut self, def: StyleDefinition) -> Self {
        match self.entries.iter().position(|s| s.id == def.id) {
            Some(i) => self.entries[i] = def,
            None => self.entries.push(def),
        }
        self
    }

    /// Resolve `style_id`, falling back to the default definition when unknown.
    pub fn lookup(&self, style_id: &str) -> &StyleDefinition {
        self.get(style_id).unwrap_or_else(|| self.fallback())
    }

    /// Exact lookup without fallback.
    pub fn get(&self, style_id: &str) -> Option<&StyleDefinition> {
        self.entries.iter().find(|s| s.id == style_id)
    }

    /// Return `true` when `style_id` names a catalog entry.
    pub fn contains(&self, style_id: &str) -> bool {
        self.get(style_id).is_some()
    }

    /// The fallback definition.
    pub fn fallback(&self) -> &StyleDefinition {
        &self.entries[self.fallback]
    }

    /// All entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/catalog.rs"]
mod tests;
