use crate::foundation::core::Rect;
use crate::foundation::error::{ArchiveError, ArchiveResult};

/// Rectangle an `image_w x image_h` source is drawn into so it covers `target` without distortion.
///
/// The overflowing axis is centred on `target`; clip to `target` when drawing.
pub fn cover_rect(image_w: f64, image_h: f64, target: Rect) -> ArchiveResult<Rect> {
    if !(image_w.is_finite() && image_h.is_finite()) || image_w <= 0.0 || image_h <= 0.0 {
        return Err(ArchiveError::validation(format!(
            "cannot fit a {image_w}x{image_h} image: source must have positive area"
        )));
    }
    let (tw, th) = (target.width(), target.height());
    if !(tw.is_finite() && th.is_finite()) || tw <= 0.0 || th <= 0.0 {
        return Err(ArchiveError::validation("cover target must have positive area"));
    }

    let image_ratio = image_w / image_h;
    let target_ratio = tw / th;

    let (render_w, render_h, x, y) = if image_ratio > target_ratio {
        let render_h = th;
        let render_w = th * image_ratio;
        (render_w, render_h, target.x0 - (render_w - tw) / 2.0, target.y0)
    } else {
        let render_w = tw;
        let render_h = tw / image_ratio;
        (render_w, render_h, target.x0, target.y0 - (render_h - th) / 2.0)
    };

    Ok(Rect::new(x, y, x + render_w, y + render_h))
}
