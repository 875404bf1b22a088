use rand::Rng;

use crate::{
    assets::decode::PreparedImage,
    config::{BedStyle, FlowerStyle, TreeStyle},
    foundation::core::{Affine, Rect},
    foundation::error::ArchiveResult,
    layout::decor::{AnchoredSprite, FlowerPlacement, place_bed, place_flower, place_tree},
    render::canvas::{Canvas, draw_image, image_to_rect},
};

fn draw_anchored(
    canvas: &mut Canvas,
    image: &PreparedImage,
    sprite: AnchoredSprite,
    opacity: f32,
) -> ArchiveResult<()> {
    let layer = canvas.render_layer(|ctx| draw_image(ctx, image, image_to_rect(image, sprite.rect)))?;
    canvas.composite(&layer, opacity)
}

/// Toned tree in the lower-left corner.
#[tracing::instrument(skip_all)]
pub fn draw_tree(
    canvas: &mut Canvas,
    tree: &PreparedImage,
    style: &TreeStyle,
) -> ArchiveResult<AnchoredSprite> {
    let canvas_h = f64::from(canvas.size().height);
    let sprite = place_tree(tree.width, tree.height, canvas_h, style)?;
    let toned = style.tone.apply_to_image(tree);
    draw_anchored(canvas, &toned, sprite, style.opacity)?;
    Ok(sprite)
}

/// Toned flower-bed along the bottom edge.
#[tracing::instrument(skip_all)]
pub fn draw_bed(
    canvas: &mut Canvas,
    bed: &PreparedImage,
    style: &BedStyle,
) -> ArchiveResult<AnchoredSprite> {
    let size = canvas.size();
    let sprite = place_bed(
        bed.width,
        bed.height,
        f64::from(size.width),
        f64::from(size.height),
        style,
    )?;
    let toned = style.tone.apply_to_image(bed);
    draw_anchored(canvas, &toned, sprite, style.opacity)?;
    Ok(sprite)
}

/// Scatter `flowers` along the edges of `frame`, each with its own drop shadow.
///
/// Flowers that failed to load are skipped without consuming randomness.
#[tracing::instrument(skip_all, fields(n = flowers.len()))]
pub fn draw_flowers<R>(
    canvas: &mut Canvas,
    flowers: &[Option<PreparedImage>],
    frame: Rect,
    style: &FlowerStyle,
    rng: &mut R,
) -> ArchiveResult<Vec<FlowerPlacement>>
where
    R: Rng + ?Sized,
{
    let mut placed = Vec::with_capacity(flowers.len());
    for flower in flowers.iter().flatten() {
        if flower.is_empty() {
            continue;
        }
        let placement = place_flower(rng, frame, style);
        let transform = placement.unit_transform()
            * Affine::scale_non_uniform(
                1.0 / f64::from(flower.width),
                1.0 / f64::from(flower.height),
            );
        canvas.paint_with_shadow(&style.shadow, None, style.opacity, |ctx| {
            draw_image(ctx, flower, transform)
        })?;
        placed.push(placement);
    }
    tracing::debug!(placed = placed.len(), "flowers drawn");
    Ok(placed)
}

#[cfg(test)]
#[path = "../../tests/unit/render/decor.rs"]
mod tests;
