use super::*;

fn black(alpha: u8, blur: f64) -> DropShadow {
    DropShadow {
        color: Rgba8::rgba(0, 0, 0, alpha),
        blur,
    }
}

#[test]
fn empty_layer_casts_no_shadow() {
    let layer = vec![0u8; 8 * 8 * 4];
    assert!(cast_shadow(&layer, 8, 8, &black(255, 3.0)).unwrap().is_none());
}

#[test]
fn transparent_shadow_is_skipped() {
    let mut layer = vec![0u8; 4 * 4 * 4];
    layer[3] = 255;
    assert!(cast_shadow(&layer, 4, 4, &black(0, 3.0)).unwrap().is_none());
}

#[test]
fn rejects_bad_buffers_and_blur() {
    assert!(cast_shadow(&[0u8; 12], 2, 2, &black(255, 1.0)).is_err());
    assert!(cast_shadow(&[0u8; 16], 2, 2, &black(255, -1.0)).is_err());
}

#[test]
fn zero_blur_copies_tinted_silhouette() {
    let (w, h) = (3u32, 1u32);
    let layer = vec![0, 0, 0, 0, 10, 20, 30, 255, 0, 0, 0, 0];
    let shadow = DropShadow {
        color: Rgba8::rgba(255, 0, 0, 255),
        blur: 0.0,
    };
    let out = cast_shadow(&layer, w, h, &shadow).unwrap().unwrap();
    assert_eq!(out, vec![0, 0, 0, 0, 255, 0, 0, 255, 0, 0, 0, 0]);
}

#[test]
fn blur_spreads_coverage_and_roughly_preserves_energy() {
    let (w, h) = (15u32, 15u32);
    let mut layer = vec![0u8; (w * h * 4) as usize];
    let center = ((7 * w + 7) * 4) as usize;
    layer[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = cast_shadow(&layer, w, h, &black(255, 4.0)).unwrap().unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 24);
    assert!(out.chunks_exact(4).all(|px| px[0] == 0 && px[1] == 0 && px[2] == 0));
}

#[test]
fn shadow_alpha_is_scaled_by_tint_alpha() {
    let (w, h) = (5u32, 5u32);
    let layer = [0u8, 0, 0, 255].repeat((w * h) as usize);
    let out = cast_shadow(&layer, w, h, &black(51, 2.0)).unwrap().unwrap();
    assert!(out.chunks_exact(4).all(|px| px[3] == 51));
}
