use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    effects::composite::{over_in_place, retain_rect_in_place},
    effects::shadow::{DropShadow, cast_shadow},
    foundation::core::{Affine, CanvasSize, Rect, Rgba8},
    foundation::error::{ArchiveError, ArchiveResult},
    foundation::math::unpremul_u8,
};

/// Flattened canvas pixels handed to export.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight RGBA8 bytes, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
        out
    }
}

/// A transparent, canvas-sized pixmap one drawing step renders into.
pub struct Layer {
    pixmap: vello_cpu::Pixmap,
}

impl Layer {
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }
}

/// The postcard surface: premultiplied RGBA8, drawn in layers.
///
/// Each step renders into a fresh [`Layer`] through a `vello_cpu::RenderContext` and is then
/// composited source-over onto the canvas, so nothing but the flattened pixels survives.
pub struct Canvas {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl Canvas {
    pub fn new(size: CanvasSize) -> ArchiveResult<Self> {
        let (width, height) = to_u16_size(size)?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Resize to `size` and clear to transparent.
    pub fn reset(&mut self, size: CanvasSize) -> ArchiveResult<()> {
        let (width, height) = to_u16_size(size)?;
        if width != self.width || height != self.height {
            *self = Self {
                width,
                height,
                pixmap: vello_cpu::Pixmap::new(width, height),
            };
        } else {
            self.pixmap.data_as_u8_slice_mut().fill(0);
        }
        Ok(())
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let idx = (y as usize * usize::from(self.width) + x as usize) * 4;
        let d = self.data();
        Some([d[idx], d[idx + 1], d[idx + 2], d[idx + 3]])
    }

    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    /// Render `draw` into a new transparent layer.
    pub fn render_layer<F>(&self, draw: F) -> ArchiveResult<Layer>
    where
        F: FnOnce(&mut vello_cpu::RenderContext) -> ArchiveResult<()>,
    {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        draw(&mut ctx)?;
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(Layer { pixmap })
    }

    pub fn composite(&mut self, layer: &Layer, opacity: f32) -> ArchiveResult<()> {
        over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            layer.pixmap.data_as_u8_slice(),
            opacity,
        )
    }

    /// Render `draw` and composite it at full opacity.
    pub fn paint<F>(&mut self, draw: F) -> ArchiveResult<()>
    where
        F: FnOnce(&mut vello_cpu::RenderContext) -> ArchiveResult<()>,
    {
        let layer = self.render_layer(draw)?;
        self.composite(&layer, 1.0)
    }

    /// Render `draw`, then composite its drop shadow followed by the layer itself.
    ///
    /// With `clip`, both shadow and layer are cut to that rectangle after the shadow is cast.
    pub fn paint_with_shadow<F>(
        &mut self,
        shadow: &DropShadow,
        clip: Option<Rect>,
        opacity: f32,
        draw: F,
    ) -> ArchiveResult<()>
    where
        F: FnOnce(&mut vello_cpu::RenderContext) -> ArchiveResult<()>,
    {
        let mut layer = self.render_layer(draw)?;
        let (w, h) = (u32::from(self.width), u32::from(self.height));
        if let Some(mut cast) = cast_shadow(layer.data(), w, h, shadow)? {
            if let Some(rect) = clip {
                retain_rect_in_place(&mut cast, w, h, rect)?;
            }
            over_in_place(self.pixmap.data_as_u8_slice_mut(), &cast, opacity)?;
        }
        if let Some(rect) = clip {
            retain_rect_in_place(layer.data_mut(), w, h, rect)?;
        }
        self.composite(&layer, opacity)
    }
}

fn to_u16_size(size: CanvasSize) -> ArchiveResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| ArchiveError::validation("canvas width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| ArchiveError::validation("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ArchiveError::validation("canvas size must be non-zero"));
    }
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn stroke(width: f64) -> vello_cpu::kurbo::Stroke {
    vello_cpu::kurbo::Stroke::new(width)
}

/// Image paint for a prepared bitmap; draw it by filling `(0, 0, width, height)`.
pub(crate) fn image_paint(image: &PreparedImage) -> ArchiveResult<vello_cpu::Image> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| ArchiveError::render("image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| ArchiveError::render("image height exceeds u16"))?;
    if image.rgba8_premul.len() != image.width as usize * image.height as usize * 4 {
        return Err(ArchiveError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(image.width as usize * image.height as usize);
    for px in image.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Fill `image` so its native pixel grid lands on `dest` under `transform`.
pub(crate) fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    image: &PreparedImage,
    transform: Affine,
) -> ArchiveResult<()> {
    let paint = image_paint(image)?;
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(image.width),
        f64::from(image.height),
    ));
    Ok(())
}

/// Transform mapping an `image` onto the axis-aligned `dest` rectangle.
pub(crate) fn image_to_rect(image: &PreparedImage, dest: Rect) -> Affine {
    Affine::translate(dest.origin().to_vec2())
        * Affine::scale_non_uniform(
            dest.width() / f64::from(image.width),
            dest.height() / f64::from(image.height),
        )
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
