use crate::{
    assets::text::{FontBook, TextBrushRgba8, first_baseline},
    foundation::core::{Affine, Vec2},
    render::canvas::affine_to_cpu,
};

/// Horizontal anchor of a text line relative to its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Start,
    Center,
    End,
}

/// Vertical anchor of a text line relative to its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    /// Origin sits on the first baseline.
    Baseline,
    /// Origin sits halfway down the line box.
    Middle,
}

/// Offset from a layout's top-left corner to the requested anchor.
pub fn anchor_offset(layout: &parley::Layout<TextBrushRgba8>, h: HAlign, v: VAlign) -> Vec2 {
    let width = f64::from(layout.width());
    let x = match h {
        HAlign::Start => 0.0,
        HAlign::Center => width / 2.0,
        HAlign::End => width,
    };
    let y = match v {
        VAlign::Baseline => first_baseline(layout),
        VAlign::Middle => f64::from(layout.height()) / 2.0,
    };
    Vec2::new(x, y)
}

/// Fill every glyph run of `layout` with its brush.
///
/// Each run is drawn with the font Parley resolved for it. Runs resolved outside `fonts`
/// (system fallback) are drawn from a copy of that font's bytes.
/// `transform` maps the anchor point chosen by `h`/`v` to the local origin.
pub fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    fonts: &FontBook,
    transform: Affine,
    h: HAlign,
    v: VAlign,
) {
    let anchor = anchor_offset(layout, h, v);
    ctx.set_transform(affine_to_cpu(transform * Affine::translate(-anchor)));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let font = run.run().font();
            let fallback;
            let data = match fonts.resolve(font.data.id(), font.index) {
                Some(face) => &face.data,
                None => {
                    tracing::debug!("glyph run resolved outside the font book");
                    fallback = vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(font.data.data().to_vec()),
                        font.index,
                    );
                    &fallback
                }
            };

            // Absolute pen positions: x accumulates advances, y is the run's baseline.
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
