use rand::{SeedableRng, rngs::StdRng};

use super::*;

fn paper(n: usize) -> Vec<u8> {
    [245u8, 241, 235, 255].repeat(n)
}

#[test]
fn zero_amount_is_identity() {
    let mut px = paper(64);
    let before = px.clone();
    let mut rng = StdRng::seed_from_u64(1);
    apply_grain(&mut px, 0.0, &mut rng).unwrap();
    assert_eq!(px, before);
}

#[test]
fn grain_is_not_idempotent_across_seeds() {
    let mut px = paper(256);
    let base = px.clone();
    apply_grain(&mut px, 15.0, &mut StdRng::seed_from_u64(1)).unwrap();
    let once = px.clone();
    apply_grain(&mut px, 15.0, &mut StdRng::seed_from_u64(2)).unwrap();
    assert_ne!(once, base);
    assert_ne!(px, once);
}

#[test]
fn offsets_stay_in_range_and_shift_channels_together() {
    let mut px = [128u8, 100, 90, 255].repeat(500);
    apply_grain(&mut px, 15.0, &mut StdRng::seed_from_u64(9)).unwrap();
    for p in px.chunks_exact(4) {
        let d = i32::from(p[0]) - 128;
        assert!((-8..=8).contains(&d));
        assert_eq!(i32::from(p[1]) - 100, d);
        assert_eq!(i32::from(p[2]) - 90, d);
        assert_eq!(p[3], 255);
    }
}

#[test]
fn values_clamp_instead_of_wrapping() {
    let mut px = [0u8, 255, 3, 255, 2, 2, 2, 2].to_vec();
    apply_grain(&mut px, 200.0, &mut StdRng::seed_from_u64(4)).unwrap();
    assert_eq!(px[3], 255);
    assert_eq!(px[7], 2);
    assert!(px[4] <= 2 && px[5] <= 2 && px[6] <= 2);
}

#[test]
fn rejects_ragged_buffers_and_negative_amounts() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(apply_grain(&mut [0u8; 5], 1.0, &mut rng).is_err());
    assert!(apply_grain(&mut [0u8; 4], -1.0, &mut rng).is_err());
}
