use rand::Rng;

use crate::{
    assets::text::{FontBook, TextLayoutEngine, TextStyle},
    config::{CaptionStyle, Style},
    foundation::core::{Affine, Point},
    foundation::error::ArchiveResult,
    random::range_value,
    render::canvas::Canvas,
    render::text::{HAlign, VAlign, fill_layout},
};

/// Where one caption line is drawn: baseline origin plus a slight tilt.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePlacement {
    pub text: String,
    pub origin: Point,
    pub rotation: f64,
}

impl LinePlacement {
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::rotate(self.rotation)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLayout {
    pub lines: Vec<LinePlacement>,
    /// Baseline the next line would use.
    pub end_y: f64,
}

/// Lay out `group` top to bottom from `start_y`, jittering each line independently.
pub fn caption_layout<R>(
    group: &[String],
    start_y: f64,
    style: &CaptionStyle,
    rng: &mut R,
) -> CaptionLayout
where
    R: Rng + ?Sized,
{
    let mut y = start_y;
    let mut lines = Vec::with_capacity(group.len());
    for text in group {
        let x = style.base_x + range_value(rng, 0.0, style.jitter_x);
        let rotation = range_value(rng, -style.max_rotation, style.max_rotation);
        lines.push(LinePlacement {
            text: text.clone(),
            origin: Point::new(x, y),
            rotation,
        });
        y += style.line_height;
    }
    CaptionLayout { lines, end_y: y }
}

/// Draw a caption group in the hand font.
///
/// Without a font the layout is still computed so the cursor advances, but nothing is drawn.
#[tracing::instrument(skip_all, fields(lines = group.len()))]
pub fn draw_caption<R>(
    canvas: &mut Canvas,
    engine: &mut TextLayoutEngine,
    fonts: &FontBook,
    style: &Style,
    group: &[String],
    rng: &mut R,
) -> ArchiveResult<CaptionLayout>
where
    R: Rng + ?Sized,
{
    let layout = caption_layout(group, style.caption_start_y(), &style.caption, rng);
    if layout.lines.is_empty() {
        return Ok(layout);
    }
    let Some(face) = fonts.hand.as_ref() else {
        tracing::warn!("hand font unavailable, caption skipped");
        return Ok(layout);
    };

    let text_style = TextStyle {
        size_px: style.fonts.hand.size_px,
        bold: false,
        brush: style.colors.text.into(),
    };
    let mut shaped = Vec::with_capacity(layout.lines.len());
    for line in &layout.lines {
        shaped.push((engine.layout_line(&line.text, face, text_style)?, line.transform()));
    }

    canvas.paint(|ctx| {
        for (text, transform) in &shaped {
            fill_layout(ctx, text, fonts, *transform, HAlign::Start, VAlign::Baseline);
        }
        Ok(())
    })?;
    Ok(layout)
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
