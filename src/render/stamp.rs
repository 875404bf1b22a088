use chrono::NaiveDate;
use rand::Rng;
use vello_cpu::kurbo::Shape;

use crate::{
    assets::text::{FontBook, TextLayoutEngine, TextStyle},
    config::Style,
    foundation::core::{Affine, Point},
    foundation::error::ArchiveResult,
    random::range_value,
    render::canvas::{Canvas, affine_to_cpu, color_to_cpu, stroke},
    render::text::{HAlign, VAlign, fill_layout},
};

/// `YYYY.MM.DD`, zero padded.
pub fn format_archive_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// Right-aligned archive date near the lower-right corner.
pub fn draw_date(
    canvas: &mut Canvas,
    engine: &mut TextLayoutEngine,
    fonts: &FontBook,
    style: &Style,
    date: NaiveDate,
) -> ArchiveResult<()> {
    let Some(face) = fonts.mono_face(false) else {
        tracing::warn!("mono font unavailable, date skipped");
        return Ok(());
    };
    let text = format_archive_date(date);
    let anchor = Point::new(
        f64::from(style.width) - style.stamp.date_inset_x,
        f64::from(style.height) - style.stamp.date_inset_y,
    );
    let layout = engine.layout_line(
        &text,
        face,
        TextStyle {
            size_px: style.fonts.mono.size_px,
            bold: false,
            brush: style.colors.date.into(),
        },
    )?;
    canvas.paint(|ctx| {
        fill_layout(
            ctx,
            &layout,
            fonts,
            Affine::translate(anchor.to_vec2()),
            HAlign::End,
            VAlign::Baseline,
        );
        Ok(())
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StampPlacement {
    pub center: Point,
    pub rotation: f64,
}

impl StampPlacement {
    pub fn transform(&self) -> Affine {
        Affine::translate(self.center.to_vec2()) * Affine::rotate(self.rotation)
    }
}

pub fn stamp_placement<R>(style: &Style, rng: &mut R) -> StampPlacement
where
    R: Rng + ?Sized,
{
    let stamp = &style.stamp;
    StampPlacement {
        center: Point::new(
            f64::from(style.width) - stamp.center_inset_x,
            f64::from(style.height) - stamp.center_inset_y,
        ),
        rotation: range_value(rng, -stamp.max_rotation, stamp.max_rotation),
    }
}

/// Tilted double-ring stamp with its text lines.
///
/// The rings are drawn even when the mono font is missing.
#[tracing::instrument(skip_all)]
pub fn draw_stamp<R>(
    canvas: &mut Canvas,
    engine: &mut TextLayoutEngine,
    fonts: &FontBook,
    style: &Style,
    rng: &mut R,
) -> ArchiveResult<StampPlacement>
where
    R: Rng + ?Sized,
{
    let placement = stamp_placement(style, rng);
    let stamp = &style.stamp;
    let transform = placement.transform();

    let mut lines = Vec::new();
    for line in &stamp.lines {
        let Some(face) = fonts.mono_face(line.bold) else {
            tracing::warn!(text = %line.text, "mono font unavailable, stamp line skipped");
            continue;
        };
        let layout = engine.layout_line(
            &line.text,
            face,
            TextStyle {
                size_px: line.size_px,
                bold: line.bold,
                brush: style.colors.date.into(),
            },
        )?;
        lines.push((layout, line.offset_y));
    }

    canvas.paint(|ctx| {
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(color_to_cpu(style.colors.date));
        for (radius, width) in [
            (stamp.outer_radius, stamp.outer_width),
            (stamp.inner_radius, stamp.inner_width),
        ] {
            let ring = vello_cpu::kurbo::Circle::new((0.0, 0.0), radius).to_path(0.1);
            ctx.set_stroke(stroke(width));
            ctx.stroke_path(&ring);
        }

        for (layout, offset_y) in &lines {
            fill_layout(
                ctx,
                layout,
                fonts,
                transform * Affine::translate((0.0, *offset_y)),
                HAlign::Center,
                VAlign::Middle,
            );
        }
        Ok(())
    })?;
    Ok(placement)
}

#[cfg(test)]
#[path = "../../tests/unit/render/stamp.rs"]
mod tests;
