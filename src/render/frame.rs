use crate::{
    config::Style,
    foundation::core::Rect,
    foundation::error::ArchiveResult,
    render::canvas::{Canvas, color_to_cpu, rect_to_cpu, stroke},
};

/// Paper background, border and the divider under the photo.
pub fn draw_frame(canvas: &mut Canvas, style: &Style) -> ArchiveResult<()> {
    let (w, h) = (f64::from(style.width), f64::from(style.height));
    let frame = &style.frame;
    let colors = &style.colors;

    let border = Rect::new(frame.margin, frame.margin, w - frame.margin, h - frame.margin);
    let divider_y = style.photo_height + frame.divider_gap;

    canvas.paint(|ctx| {
        ctx.set_paint(color_to_cpu(colors.bg));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        ctx.set_paint(color_to_cpu(colors.border));
        ctx.set_stroke(stroke(frame.border_width));
        ctx.stroke_rect(&rect_to_cpu(border));

        let mut divider = vello_cpu::kurbo::BezPath::new();
        divider.move_to((frame.divider_inset, divider_y));
        divider.line_to((w - frame.divider_inset, divider_y));
        ctx.set_paint(color_to_cpu(colors.divider));
        ctx.set_stroke(stroke(frame.divider_width));
        ctx.stroke_path(&divider);
        Ok(())
    })
}
