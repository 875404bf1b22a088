use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ArchiveError, ArchiveResult};
use crate::foundation::math::{mul_div255_u8, rgba8_len};

/// A zero-offset drop shadow, parameterised like a canvas `shadowBlur`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropShadow {
    pub color: Rgba8,
    /// Blur extent in pixels; the gaussian sigma is half of it.
    pub blur: f64,
}

impl DropShadow {
    pub fn is_visible(&self) -> bool {
        self.color.a > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelBox {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelBox {
    fn width(self) -> u32 {
        self.x1 - self.x0
    }

    fn height(self) -> u32 {
        self.y1 - self.y0
    }
}

/// Build the premultiplied shadow of a premultiplied RGBA8 layer.
///
/// Returns `None` when the layer is empty or the shadow is fully transparent. Only the bounding
/// box of the layer's coverage, grown by the blur radius, is processed.
pub fn cast_shadow(
    layer: &[u8],
    width: u32,
    height: u32,
    shadow: &DropShadow,
) -> ArchiveResult<Option<Vec<u8>>> {
    let expected_len = rgba8_len(width, height)
        .ok_or_else(|| ArchiveError::render("shadow buffer size overflow"))?;
    if layer.len() != expected_len {
        return Err(ArchiveError::render(
            "cast_shadow expects layer matching width*height*4",
        ));
    }
    if !shadow.blur.is_finite() || shadow.blur < 0.0 {
        return Err(ArchiveError::validation("shadow blur must be finite and >= 0"));
    }
    if !shadow.is_visible() {
        return Ok(None);
    }
    let Some(coverage) = alpha_bounds(layer, width, height) else {
        return Ok(None);
    };

    let radius = shadow.blur.ceil() as u32;
    let region = PixelBox {
        x0: coverage.x0.saturating_sub(radius),
        y0: coverage.y0.saturating_sub(radius),
        x1: (coverage.x1 + radius).min(width),
        y1: (coverage.y1 + radius).min(height),
    };

    let (rw, rh) = (region.width() as usize, region.height() as usize);
    let mut alpha = vec![0u8; rw * rh];
    for y in 0..rh {
        let src_row = (region.y0 as usize + y) * width as usize;
        for x in 0..rw {
            alpha[y * rw + x] = layer[(src_row + region.x0 as usize + x) * 4 + 3];
        }
    }

    if radius > 0 {
        let kernel = gaussian_kernel_q16(radius, (shadow.blur / 2.0) as f32)?;
        let mut tmp = vec![0u8; alpha.len()];
        horizontal_pass(&alpha, &mut tmp, rw, rh, &kernel);
        vertical_pass(&tmp, &mut alpha, rw, rh, &kernel);
    }

    let tint = shadow.color;
    let mut out = vec![0u8; expected_len];
    for y in 0..rh {
        let dst_row = (region.y0 as usize + y) * width as usize;
        for x in 0..rw {
            let a = mul_div255_u8(u16::from(alpha[y * rw + x]), u16::from(tint.a));
            if a == 0 {
                continue;
            }
            let idx = (dst_row + region.x0 as usize + x) * 4;
            out[idx] = mul_div255_u8(u16::from(tint.r), u16::from(a));
            out[idx + 1] = mul_div255_u8(u16::from(tint.g), u16::from(a));
            out[idx + 2] = mul_div255_u8(u16::from(tint.b), u16::from(a));
            out[idx + 3] = a;
        }
    }
    Ok(Some(out))
}

fn alpha_bounds(layer: &[u8], width: u32, height: u32) -> Option<PixelBox> {
    let mut bounds: Option<PixelBox> = None;
    let w = width as usize;
    for y in 0..height as usize {
        let row = &layer[y * w * 4..(y + 1) * w * 4];
        let first = row.chunks_exact(4).position(|px| px[3] != 0);
        let Some(first) = first else {
            continue;
        };
        let last = row
            .chunks_exact(4)
            .rposition(|px| px[3] != 0)
            .unwrap_or(first);
        let (fx, lx, yy) = (first as u32, last as u32 + 1, y as u32);
        bounds = Some(match bounds {
            None => PixelBox {
                x0: fx,
                y0: yy,
                x1: lx,
                y1: yy + 1,
            },
            Some(b) => PixelBox {
                x0: b.x0.min(fx),
                y0: b.y0,
                x1: b.x1.max(lx),
                y1: yy + 1,
            },
        });
    }
    bounds
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ArchiveResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ArchiveError::validation("blur sigma must be > 0"));
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

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x as isize + ki as isize - radius).clamp(0, w as isize - 1);
                acc += u64::from(kw) * u64::from(row[sx as usize]);
            }
            dst[y * w + x] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y as isize + ki as isize - radius).clamp(0, h as isize - 1);
                acc += u64::from(kw) * u64::from(src[sy as usize * w + x]);
            }
            dst[y * w + x] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
