use rand::Rng;

use crate::{
    config::{BedStyle, FlowerStyle, TreeStyle},
    foundation::core::{Affine, Point, Rect, Size, Vec2},
    foundation::error::{ArchiveError, ArchiveResult},
    random::range_value,
};

/// Edge of the photo frame a flower is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// A sprite drawn axis-aligned at `rect`, scaled uniformly from its native size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchoredSprite {
    pub rect: Rect,
    pub scale: f64,
}

/// A square flower sprite centred on a point of the frame boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowerPlacement {
    pub side: Side,
    pub center: Point,
    pub rotation: f64,
    pub size: f64,
}

impl FlowerPlacement {
    /// Maps the unit square `[0,1]^2` onto the rotated sprite square.
    pub fn unit_transform(&self) -> Affine {
        Affine::translate(self.center.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::translate(Vec2::new(-self.size / 2.0, -self.size / 2.0))
            * Affine::scale(self.size)
    }
}

/// Uniform scale that caps the width at `max_width` and never enlarges.
pub fn fit_width_scale(native_w: f64, max_width: f64) -> f64 {
    (max_width / native_w).min(1.0)
}

fn native_size(image_w: u32, image_h: u32) -> ArchiveResult<Size> {
    if image_w == 0 || image_h == 0 {
        return Err(ArchiveError::validation("sprite must have positive area"));
    }
    Ok(Size::new(f64::from(image_w), f64::from(image_h)))
}

/// Tree hugging the left edge, its bottom `bottom_offset` above the canvas bottom.
pub fn place_tree(
    image_w: u32,
    image_h: u32,
    canvas_h: f64,
    style: &TreeStyle,
) -> ArchiveResult<AnchoredSprite> {
    let native = native_size(image_w, image_h)?;
    let scale = fit_width_scale(native.width, style.max_width);
    let (w, h) = (native.width * scale, native.height * scale);
    let x = style.offset_x;
    let y = canvas_h - h - style.bottom_offset;
    Ok(AnchoredSprite {
        rect: Rect::new(x, y, x + w, y + h),
        scale,
    })
}

/// Flower-bed flush with the left and bottom canvas edges.
pub fn place_bed(
    image_w: u32,
    image_h: u32,
    canvas_w: f64,
    canvas_h: f64,
    style: &BedStyle,
) -> ArchiveResult<AnchoredSprite> {
    let native = native_size(image_w, image_h)?;
    let scale = fit_width_scale(native.width, style.max_width.unwrap_or(canvas_w));
    let (w, h) = (native.width * scale, native.height * scale);
    let y = canvas_h - h;
    Ok(AnchoredSprite {
        rect: Rect::new(0.0, y, w, canvas_h),
        scale,
    })
}

/// Attach one flower to a uniformly chosen side of `frame`.
pub fn place_flower<R>(rng: &mut R, frame: Rect, style: &FlowerStyle) -> FlowerPlacement
where
    R: Rng + ?Sized,
{
    let side = Side::ALL[rng.random_range(0..Side::ALL.len())];
    let center = match side {
        Side::Top => Point::new(range_value(rng, frame.x0, frame.x1), frame.y0),
        Side::Right => Point::new(frame.x1, range_value(rng, frame.y0, frame.y1)),
        Side::Bottom => Point::new(range_value(rng, frame.x0, frame.x1), frame.y1),
        Side::Left => Point::new(frame.x0, range_value(rng, frame.y0, frame.y1)),
    };
    let size = range_value(rng, style.size_min, style.size_max);
    let rotation = range_value(rng, 0.0, std::f64::consts::TAU);
    FlowerPlacement {
        side,
        center,
        rotation,
        size,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/decor.rs"]
mod tests;
