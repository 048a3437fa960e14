use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn blur_rejects_bad_sigma_and_len() {
    let src = vec![0u8; 16];
    assert!(blur_rgba8_premul(&src, 2, 2, 1, 0.0).is_err());
    assert!(blur_rgba8_premul(&src, 3, 2, 1, 1.0).is_err());
}

#[test]
fn region_blur_leaves_outside_untouched() {
    let (w, h) = (8u32, 8u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    let idx = ((3 * w + 3) * 4) as usize;
    buf[idx..idx + 4].copy_from_slice(&[255, 255, 255, 255]);
    // A marker pixel outside the region must survive the pass.
    buf[0..4].copy_from_slice(&[9, 9, 9, 9]);

    let rect = PixelRect {
        x0: 1,
        y0: 1,
        x1: 6,
        y1: 6,
    };
    blur_region_in_place(&mut buf, w, rect, 2, 1.0).unwrap();

    assert_eq!(&buf[0..4], &[9, 9, 9, 9]);
    assert!(buf[idx + 3] < 255);
    let left = ((3 * w + 2) * 4) as usize;
    assert!(buf[left + 3] > 0);
}

#[test]
fn padded_rect_clamps_to_canvas() {
    let r = PixelRect::padded(-5.0, 10.2, 50.5, 700.0, 15, 100, 720);
    assert_eq!(r.x0, 0);
    assert_eq!(r.y0, 0);
    assert_eq!(r.x1, 66);
    assert_eq!(r.y1, 715);
    assert!(PixelRect::padded(10.0, 10.0, 10.0, 10.0, 0, 20, 20).is_empty());
}

#[test]
fn canvas_shadow_blur_maps_to_half_sigma() {
    assert_eq!(shadow_kernel_params(10.0), (15, 5.0));
    assert_eq!(shadow_kernel_params(0.0).0, 0);
    assert_eq!(shadow_kernel_params(f32::NAN).0, 0);
}
