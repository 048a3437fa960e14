use crate::foundation::error::{AnimegenError, AnimegenResult};

pub use kurbo::Point;

/// Raster canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Placeholder output size (720p).
    pub const HD: Self = Self {
        width: 1280,
        height: 720,
    };

    /// Canvas centre point.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Byte length of a tightly packed RGBA8 buffer for this canvas.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::HD
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiply color channels by alpha.
    pub fn to_premul_array(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Frame rates offered by the generator.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum FrameRate {
    /// 12 fps.
    Fps12,
    /// 24 fps.
    #[default]
    Fps24,
    /// 30 fps.
    Fps30,
    /// 60 fps.
    Fps60,
}

impl FrameRate {
    /// All supported rates in ascending order.
    pub const ALL: [Self; 4] = [Self::Fps12, Self::Fps24, Self::Fps30, Self::Fps60];

    /// Accept only one of the supported rates.
    pub fn new(fps: u32) -> AnimegenResult<Self> {
        match fps {
            12 => Ok(Self::Fps12),
            24 => Ok(Self::Fps24),
            30 => Ok(Self::Fps30),
            60 => Ok(Self::Fps60),
            other => Err(AnimegenError::validation(format!(
                "frame rate must be one of 12, 24, 30, 60 (got {other})"
            ))),
        }
    }

    /// Frames per second as an integer.
    pub fn get(self) -> u32 {
        match self {
            Self::Fps12 => 12,
            Self::Fps24 => 24,
            Self::Fps30 => 30,
            Self::Fps60 => 60,
        }
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = AnimegenError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<FrameRate> for u32 {
    fn from(v: FrameRate) -> Self {
        v.get()
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Requested clip length in whole seconds, `3..=30`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct ClipDuration(u32);

impl ClipDuration {
    /// Shortest accepted clip.
    pub const MIN_SECS: u32 = 3;
    /// Longest accepted clip.
    pub const MAX_SECS: u32 = 30;

    /// Create a validated duration.
    pub fn from_secs(secs: u32) -> AnimegenResult<Self> {
        if !(Self::MIN_SECS..=Self::MAX_SECS).contains(&secs) {
            return Err(AnimegenError::validation(format!(
                "duration must be within {}..={} seconds (got {secs})",
                Self::MIN_SECS,
                Self::MAX_SECS
            )));
        }
        Ok(Self(secs))
    }

    /// Duration in seconds.
    pub fn secs(self) -> u32 {
        self.0
    }
}

impl Default for ClipDuration {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u32> for ClipDuration {
    type Error = AnimegenError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::from_secs(v)
    }
}

impl From<ClipDuration> for u32 {
    fn from(v: ClipDuration) -> Self {
        v.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
