use std::path::Path;

use anyhow::Context;

use crate::{
    config::FontsConfig,
    foundation::core::Rgba8,
    foundation::error::{ArchiveError, ArchiveResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Clone)]
/// A font registered with a [`TextLayoutEngine`], plus the glyph source for drawing.
pub struct FontFace {
    /// Family name Parley resolved from the font data.
    pub family: String,
    /// Glyph outlines handed to the rasterizer.
    pub data: vello_cpu::peniko::FontData,
    blob_id: u64,
    byte_len: usize,
}

impl FontFace {
    /// Whether a shaped run that resolved to blob `blob_id`, face `index` came from this face.
    pub fn matches(&self, blob_id: u64, index: u32) -> bool {
        self.blob_id == blob_id && self.data.index == index
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("byte_len", &self.byte_len)
            .finish()
    }
}

/// The faces the postcard uses. Any may be missing; text needing it is then skipped.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    pub mono: Option<FontFace>,
    /// Bold companion of `mono`, used for bold stamp lines.
    pub mono_bold: Option<FontFace>,
    pub hand: Option<FontFace>,
}

impl FontBook {
    /// Register the configured font files, resolving relative paths against `root`.
    ///
    /// Unreadable or unparsable fonts are logged and left absent.
    pub fn load(engine: &mut TextLayoutEngine, fonts: &FontsConfig, root: &Path) -> Self {
        Self {
            mono: load_face(engine, &fonts.mono.source, root, "mono"),
            mono_bold: fonts
                .mono_bold
                .as_deref()
                .and_then(|source| load_face(engine, source, root, "mono_bold")),
            hand: load_face(engine, &fonts.hand.source, root, "hand"),
        }
    }

    /// Every loaded face.
    pub fn faces(&self) -> impl Iterator<Item = &FontFace> {
        [&self.mono, &self.mono_bold, &self.hand]
            .into_iter()
            .flatten()
    }

    /// Face for a mono line; bold lines prefer `mono_bold` and fall back to `mono`.
    pub fn mono_face(&self, bold: bool) -> Option<&FontFace> {
        if bold {
            self.mono_bold.as_ref().or(self.mono.as_ref())
        } else {
            self.mono.as_ref()
        }
    }

    /// The loaded face a shaped run resolved to, if any.
    pub fn resolve(&self, blob_id: u64, index: u32) -> Option<&FontFace> {
        self.faces().find(|face| face.matches(blob_id, index))
    }
}

fn load_face(
    engine: &mut TextLayoutEngine,
    source: &Path,
    root: &Path,
    role: &str,
) -> Option<FontFace> {
    let path = root.join(source);
    let loaded = std::fs::read(&path)
        .with_context(|| format!("read font '{}'", path.display()))
        .map_err(ArchiveError::from)
        .and_then(|bytes| engine.register_font(bytes));
    match loaded {
        Ok(face) => {
            tracing::debug!(role, family = %face.family, "registered font");
            Some(face)
        }
        Err(err) => {
            tracing::warn!(role, path = %path.display(), error = %err, "font unavailable");
            None
        }
    }
}

/// Per-layout text styling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub bold: bool,
    pub brush: TextBrushRgba8,
}

/// Stateful helper for building Parley text layouts from registered fonts.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register raw font bytes and return the resolved face.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> ArchiveResult<FontFace> {
        let byte_len = font_bytes.len();
        let blob = parley::fontique::Blob::from(font_bytes.clone());
        let blob_id = blob.id();
        let families = self.font_ctx.collection.register_fonts(blob, None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ArchiveError::asset("no font families registered from font bytes"))?;

        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ArchiveError::asset("registered font family has no name"))?
            .to_string();

        Ok(FontFace {
            family,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
            blob_id,
            byte_len,
        })
    }

    /// Shape a single unwrapped line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        style: TextStyle,
    ) -> ArchiveResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(ArchiveError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(style.brush));
        if style.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Distance from the top of `layout` to its first baseline.
pub fn first_baseline(layout: &parley::Layout<TextBrushRgba8>) -> f64 {
    layout
        .lines()
        .next()
        .map(|line| f64::from(line.metrics().baseline))
        .unwrap_or(0.0)
}
