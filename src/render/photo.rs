use crate::{
    assets::decode::PreparedImage,
    config::PhotoStyle,
    effects::composite::retain_rect_in_place,
    foundation::core::Rect,
    foundation::error::ArchiveResult,
    layout::fit::cover_rect,
    render::canvas::{Canvas, color_to_cpu, draw_image, image_to_rect, rect_to_cpu, stroke},
};

/// Draw `photo` covering `target`, clipped to it, and outline the frame.
///
/// Returns the unclipped rectangle the photo was scaled into.
#[tracing::instrument(skip_all, fields(w = photo.width, h = photo.height))]
pub fn draw_photo(
    canvas: &mut Canvas,
    photo: &PreparedImage,
    target: Rect,
    style: &PhotoStyle,
) -> ArchiveResult<Rect> {
    let dest = cover_rect(f64::from(photo.width), f64::from(photo.height), target)?;
    tracing::debug!(?dest, "photo cover rect");

    let size = canvas.size();
    let mut layer = canvas.render_layer(|ctx| draw_image(ctx, photo, image_to_rect(photo, dest)))?;
    retain_rect_in_place(layer.data_mut(), size.width, size.height, target)?;
    canvas.composite(&layer, 1.0)?;

    canvas.paint_with_shadow(&style.shadow, Some(target), 1.0, |ctx| {
        ctx.set_paint(color_to_cpu(style.accent));
        ctx.set_stroke(stroke(style.accent_width));
        ctx.stroke_rect(&rect_to_cpu(target));
        Ok(())
    })?;

    Ok(dest)
}
