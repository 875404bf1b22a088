use rand::Rng;

use crate::foundation::error::{ArchiveError, ArchiveResult};

/// Add film grain to premultiplied RGBA8 pixels in place.
///
/// Each pixel draws one offset from `[-amount/2, amount/2)` and adds it to R, G and B alike, so the
/// noise shifts luminance without tinting. Results are rounded and clamped to `0..=alpha`, which
/// keeps the buffer valid premultiplied data and avoids 8-bit wraparound. Alpha is untouched.
/// `amount == 0` leaves the buffer unchanged and draws nothing from `rng`.
pub fn apply_grain<R>(rgba8_premul: &mut [u8], amount: f64, rng: &mut R) -> ArchiveResult<()>
where
    R: Rng + ?Sized,
{
    if !rgba8_premul.len().is_multiple_of(4) {
        return Err(ArchiveError::render(
            "apply_grain expects an rgba8 buffer",
        ));
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err(ArchiveError::validation("grain amount must be finite and >= 0"));
    }
    if amount == 0.0 {
        return Ok(());
    }

    for px in rgba8_premul.chunks_exact_mut(4) {
        let offset = (rng.random::<f64>() - 0.5) * amount;
        let max = f64::from(px[3]);
        for c in &mut px[..3] {
            *c = (f64::from(*c) + offset).round().clamp(0.0, max) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
