use crate::foundation::error::{AnimegenError, AnimegenResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Source-over of premultiplied RGBA8 `src` onto `dst`, in place.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> AnimegenResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(AnimegenError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = s[3].saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = s[c].saturating_add(dc);
        }
    }
    Ok(())
}

/// Replace the color channels of a premultiplied coverage buffer with `rgba`, keeping only
/// each pixel's alpha as coverage.
pub(crate) fn tint_coverage_in_place(buf: &mut [u8], rgba: [u8; 4]) {
    let [r, g, b, a] = rgba;
    for px in buf.chunks_exact_mut(4) {
        let cov = u16::from(px[3]);
        px[3] = mul_div255_u8(u16::from(a), cov);
        px[0] = mul_div255_u8(u16::from(r), cov);
        px[1] = mul_div255_u8(u16::from(g), cov);
        px[2] = mul_div255_u8(u16::from(b), cov);
    }
}

/// Convert premultiplied RGBA8 to straight alpha, in place.
pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in 0..3 {
            let v = (u32::from(px[c]) * 255 + a / 2) / a;
            px[c] = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
