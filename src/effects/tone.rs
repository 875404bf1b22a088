use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    assets::decode::PreparedImage,
    foundation::math::{mul_div255_u8, unpremul_u8},
};

/// Colour grading applied to sprites before drawing: CSS-style `sepia()` then `contrast()`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneFilter {
    /// 0 = unchanged, 1 = full sepia.
    pub sepia: f32,
    /// 1 = unchanged.
    pub contrast: f32,
}

impl Default for ToneFilter {
    fn default() -> Self {
        Self {
            sepia: 0.0,
            contrast: 1.0,
        }
    }
}

impl ToneFilter {
    pub fn is_identity(&self) -> bool {
        self.sepia <= 0.0 && (self.contrast - 1.0).abs() <= f32::EPSILON
    }

    fn sepia_matrix(&self) -> [[f32; 3]; 3] {
        let k = 1.0 - self.sepia.clamp(0.0, 1.0);
        [
            [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
            [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
            [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
        ]
    }

    /// Filter one straight RGB triple.
    pub fn apply_rgb(&self, rgb: [u8; 3]) -> [u8; 3] {
        let m = self.sepia_matrix();
        let c = self.contrast.max(0.0);
        let src = rgb.map(|v| f32::from(v) / 255.0);
        let mut out = [0u8; 3];
        for (o, row) in out.iter_mut().zip(m.iter()) {
            let v = row[0] * src[0] + row[1] * src[1] + row[2] * src[2];
            let v = ((v.min(1.0) - 0.5) * c + 0.5).clamp(0.0, 1.0);
            *o = (v * 255.0).round() as u8;
        }
        out
    }

    /// Filter premultiplied RGBA8 pixels in place; alpha is preserved.
    pub fn apply_premul_in_place(&self, rgba8_premul: &mut [u8]) {
        if self.is_identity() {
            return;
        }
        for px in rgba8_premul.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 {
                continue;
            }
            let straight = [
                unpremul_u8(px[0], a),
                unpremul_u8(px[1], a),
                unpremul_u8(px[2], a),
            ];
            let toned = self.apply_rgb(straight);
            for (dst, v) in px.iter_mut().zip(toned) {
                *dst = mul_div255_u8(u16::from(v), u16::from(a));
            }
        }
    }

    /// Filtered copy of `image`; shares the pixel buffer when the filter is a no-op.
    pub fn apply_to_image(&self, image: &PreparedImage) -> PreparedImage {
        if self.is_identity() {
            return image.clone();
        }
        let mut bytes = image.rgba8_premul.as_ref().clone();
        self.apply_premul_in_place(&mut bytes);
        PreparedImage {
            width: image.width,
            height: image.height,
            rgba8_premul: Arc::new(bytes),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tone.rs"]
mod tests;
