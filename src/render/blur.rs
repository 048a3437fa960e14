use crate::foundation::error::{AnimegenError, AnimegenResult};

/// Axis-aligned pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x0: u32,
    pub(crate) y0: u32,
    pub(crate) x1: u32,
    pub(crate) y1: u32,
}

impl PixelRect {
    /// Build a rect from float bounds, expanded by `pad` and clamped to `width x height`.
    pub(crate) fn padded(
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        pad: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let pad = f64::from(pad);
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(width)) as u32;
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(height)) as u32;
        Self {
            x0: clamp_x((x0 - pad).floor()),
            y0: clamp_y((y0 - pad).floor()),
            x1: clamp_x((x1 + pad).ceil()),
            y1: clamp_y((y1 + pad).ceil()),
        }
    }

    pub(crate) fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub(crate) fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub(crate) fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Map a canvas-style `shadowBlur` extent to a Gaussian `(radius, sigma)` pair.
///
/// `sigma = blur / 2`, radius covers three sigmas.
pub(crate) fn shadow_kernel_params(blur_px: f32) -> (u32, f32) {
    if !blur_px.is_finite() || blur_px <= 0.0 {
        return (0, 1.0);
    }
    let sigma = blur_px / 2.0;
    ((sigma * 3.0).ceil() as u32, sigma)
}

/// Gaussian blur of a premultiplied RGBA8 buffer.
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> AnimegenResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| AnimegenError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(AnimegenError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur only `rect` of a `width`-wide premultiplied RGBA8 buffer, in place.
pub(crate) fn blur_region_in_place(
    buf: &mut [u8],
    width: u32,
    rect: PixelRect,
    radius: u32,
    sigma: f32,
) -> AnimegenResult<()> {
    if rect.is_empty() || radius == 0 {
        return Ok(());
    }
    let stride = (width as usize) * 4;
    let row_len = (rect.width() as usize) * 4;
    let mut region = Vec::with_capacity(row_len * rect.height() as usize);
    for y in rect.y0..rect.y1 {
        let start = (y as usize) * stride + (rect.x0 as usize) * 4;
        let row = buf
            .get(start..start + row_len)
            .ok_or_else(|| AnimegenError::render("blur region outside buffer"))?;
        region.extend_from_slice(row);
    }

    let blurred = blur_rgba8_premul(&region, rect.width(), rect.height(), radius, sigma)?;

    for (i, y) in (rect.y0..rect.y1).enumerate() {
        let start = (y as usize) * stride + (rect.x0 as usize) * 4;
        buf[start..start + row_len].copy_from_slice(&blurred[i * row_len..(i + 1) * row_len]);
    }
    Ok(())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> AnimegenResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(AnimegenError::render("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(AnimegenError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Fold rounding drift into the centre tap so weights sum to exactly 1.0 in Q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
