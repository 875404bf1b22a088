//! Style constants, asset catalog and caption configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON file only needs the keys it
//! overrides. Defaults reproduce the reference postcard.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    assets::catalog::AssetCatalog,
    effects::{shadow::DropShadow, tone::ToneFilter},
    foundation::core::{CanvasSize, Rect, Rgba8},
    foundation::error::{ArchiveError, ArchiveResult},
    random::pick_one,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub style: Style,
    pub assets: AssetCatalog,
}

impl ArchiveConfig {
    pub fn from_json_str(s: &str) -> ArchiveResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ArchiveError::config(format!("invalid config json: {e}")))?;
        cfg.style.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> ArchiveResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub width: u32,
    pub height: u32,
    pub photo_height: f64,
    pub colors: Palette,
    pub fonts: FontsConfig,
    pub frame: FrameStyle,
    pub photo: PhotoStyle,
    pub decor: DecorStyle,
    pub caption: CaptionStyle,
    pub stamp: StampStyle,
    pub grain: GrainStyle,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: 900,
            height: 1100,
            photo_height: 720.0,
            colors: Palette::default(),
            fonts: FontsConfig::default(),
            frame: FrameStyle::default(),
            photo: PhotoStyle::default(),
            decor: DecorStyle::default(),
            caption: CaptionStyle::default(),
            stamp: StampStyle::default(),
            grain: GrainStyle::default(),
        }
    }
}

impl Style {
    pub fn canvas_size(&self) -> ArchiveResult<CanvasSize> {
        CanvasSize::new(self.width, self.height)
    }

    /// The frame rectangle reserved for the photo.
    pub fn photo_rect(&self) -> Rect {
        let inset = self.photo.inset;
        Rect::new(
            inset,
            inset,
            f64::from(self.width) - inset,
            inset + self.photo_height,
        )
    }

    /// Baseline of the first caption line.
    pub fn caption_start_y(&self) -> f64 {
        self.photo_height + self.caption.start_gap
    }

    pub fn validate(&self) -> ArchiveResult<()> {
        self.canvas_size()?;
        if !self.photo_height.is_finite() || self.photo_height <= 0.0 {
            return Err(ArchiveError::config("photo_height must be finite and > 0"));
        }
        let photo = self.photo_rect();
        if photo.width() <= 0.0 || photo.height() <= 0.0 {
            return Err(ArchiveError::config("photo frame has no area"));
        }
        let flowers = &self.decor.flowers;
        if flowers.count_min > flowers.count_max {
            return Err(ArchiveError::config("flower count_min must be <= count_max"));
        }
        if flowers.size_min > flowers.size_max || flowers.size_min < 0.0 {
            return Err(ArchiveError::config("flower size range is invalid"));
        }
        if !self.grain.amount.is_finite() || self.grain.amount < 0.0 {
            return Err(ArchiveError::config("grain amount must be finite and >= 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub bg: Rgba8,
    pub border: Rgba8,
    pub divider: Rgba8,
    pub text: Rgba8,
    pub date: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: Rgba8::rgb(0xf5, 0xf1, 0xeb),
            border: Rgba8::rgb(0x8c, 0x2f, 0x2f),
            divider: Rgba8::rgb(0x6e, 0x1f, 0x1f),
            text: Rgba8::rgb(0x3a, 0x0f, 0x0f),
            date: Rgba8::rgb(0x7a, 0x1f, 0x1f),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font file, relative to the font root.
    pub source: PathBuf,
    pub size_px: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Monospace face for the date and stamp.
    pub mono: FontSpec,
    /// Bold monospace file for bold stamp lines, sized per line. `null` falls back to `mono`.
    pub mono_bold: Option<PathBuf>,
    /// Script face for captions.
    pub hand: FontSpec,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            mono: FontSpec {
                source: PathBuf::from("fonts/SpaceMono-Regular.ttf"),
                size_px: 24.0,
            },
            mono_bold: Some(PathBuf::from("fonts/SpaceMono-Bold.ttf")),
            hand: FontSpec {
                source: PathBuf::from("fonts/LXGWWenKai-Regular.ttf"),
                size_px: 48.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    /// Inset of the border stroke from the canvas edges.
    pub margin: f64,
    pub border_width: f64,
    /// Horizontal inset of the divider ends.
    pub divider_inset: f64,
    /// Distance of the divider below `photo_height`.
    pub divider_gap: f64,
    pub divider_width: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            margin: 20.0,
            border_width: 12.0,
            divider_inset: 80.0,
            divider_gap: 60.0,
            divider_width: 3.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoStyle {
    pub inset: f64,
    pub accent_width: f64,
    pub accent: Rgba8,
    pub shadow: DropShadow,
}

impl Default for PhotoStyle {
    fn default() -> Self {
        Self {
            inset: 40.0,
            accent_width: 2.0,
            accent: Rgba8::rgb(0, 0, 0).with_alpha_f(0.1),
            shadow: DropShadow {
                color: Rgba8::rgb(0, 0, 0).with_alpha_f(0.2),
                blur: 20.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorStyle {
    pub tree: TreeStyle,
    pub flowers: FlowerStyle,
    pub bed: BedStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeStyle {
    pub max_width: f64,
    /// Left edge of the sprite; negative hangs off the canvas.
    pub offset_x: f64,
    /// Gap between the sprite's bottom edge and the canvas bottom.
    pub bottom_offset: f64,
    pub tone: ToneFilter,
    pub opacity: f32,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self {
            max_width: 250.0,
            offset_x: -20.0,
            bottom_offset: 100.0,
            tone: ToneFilter {
                sepia: 0.5,
                contrast: 1.2,
            },
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerStyle {
    /// Inclusive lower bound of the uniform count sample.
    pub count_min: usize,
    /// Exclusive upper bound of the uniform count sample.
    pub count_max: usize,
    pub size_min: f64,
    pub size_max: f64,
    pub shadow: DropShadow,
    pub opacity: f32,
}

impl Default for FlowerStyle {
    fn default() -> Self {
        Self {
            count_min: 4,
            count_max: 7,
            size_min: 60.0,
            size_max: 100.0,
            shadow: DropShadow {
                color: Rgba8::rgb(0, 0, 0).with_alpha_f(0.2),
                blur: 5.0,
            },
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedStyle {
    /// Maximum rendered width; `None` means the canvas width.
    pub max_width: Option<f64>,
    pub tone: ToneFilter,
    pub opacity: f32,
}

impl Default for BedStyle {
    fn default() -> Self {
        Self {
            max_width: None,
            tone: ToneFilter {
                sepia: 0.3,
                contrast: 1.0,
            },
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    /// Gap between `photo_height` and the first baseline.
    pub start_gap: f64,
    pub base_x: f64,
    /// Width of the uniform horizontal jitter added to `base_x`.
    pub jitter_x: f64,
    /// Rotations are sampled from `[-max_rotation, max_rotation)` radians.
    pub max_rotation: f64,
    pub line_height: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            start_gap: 80.0,
            base_x: 100.0,
            jitter_x: 20.0,
            max_rotation: 0.01,
            line_height: 60.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StampLine {
    pub text: String,
    pub size_px: f32,
    #[serde(default)]
    pub bold: bool,
    /// Vertical centre of the line relative to the stamp centre.
    pub offset_y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampStyle {
    /// Date baseline anchor, measured from the right and bottom canvas edges.
    pub date_inset_x: f64,
    pub date_inset_y: f64,
    /// Stamp centre, measured from the right and bottom canvas edges.
    pub center_inset_x: f64,
    pub center_inset_y: f64,
    pub max_rotation: f64,
    pub outer_radius: f64,
    pub outer_width: f64,
    pub inner_radius: f64,
    pub inner_width: f64,
    pub lines: Vec<StampLine>,
}

impl Default for StampStyle {
    fn default() -> Self {
        Self {
            date_inset_x: 80.0,
            date_inset_y: 60.0,
            center_inset_x: 120.0,
            center_inset_y: 140.0,
            max_rotation: 0.2,
            outer_radius: 35.0,
            outer_width: 3.0,
            inner_radius: 30.0,
            inner_width: 1.0,
            lines: vec![
                StampLine {
                    text: "MARS".to_string(),
                    size_px: 16.0,
                    bold: true,
                    offset_y: -5.0,
                },
                StampLine {
                    text: "ARCHIVE".to_string(),
                    size_px: 12.0,
                    bold: false,
                    offset_y: 10.0,
                },
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrainStyle {
    /// Full width of the symmetric per-pixel offset range.
    pub amount: f64,
}

impl Default for GrainStyle {
    fn default() -> Self {
        Self { amount: 15.0 }
    }
}

/// Caption groups, each an ordered list of lines rendered together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionSet {
    groups: Vec<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CaptionFile {
    Groups(Vec<Vec<String>>),
    Wrapped {
        #[serde(alias = "captions")]
        lyrics: Vec<Vec<String>>,
    },
}

impl CaptionSet {
    pub fn new(groups: Vec<Vec<String>>) -> ArchiveResult<Self> {
        if groups.is_empty() {
            return Err(ArchiveError::config("caption set must contain at least one group"));
        }
        Ok(Self { groups })
    }

    /// Built-in captions used when no caption file can be read.
    pub fn fallback() -> Self {
        const GROUPS: [[&str; 2]; 8] = [
            ["在孤独里", "我依然狂奔"],
            ["星尘的尽头", "是你的回响"],
            ["这里没有引力", "只有思念"],
            ["第 19 个太阳日", "风沙很大"],
            ["记录此刻", "永恒的红"],
            ["致遥远的", "蓝色星球"],
            ["漫游指南", "丢失在风里"],
            ["不朽的", "是此刻的沉默"],
        ];
        Self {
            groups: GROUPS
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    pub fn from_json_str(s: &str) -> ArchiveResult<Self> {
        let file: CaptionFile = serde_json::from_str(s)
            .map_err(|e| ArchiveError::config(format!("invalid caption json: {e}")))?;
        let groups = match file {
            CaptionFile::Groups(g) => g,
            CaptionFile::Wrapped { lyrics } => lyrics,
        };
        Self::new(groups)
    }

    /// Load captions from `path`, falling back to [`CaptionSet::fallback`] on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("read captions '{}'", path.display()))
            .map_err(ArchiveError::from)
            .and_then(|s| Self::from_json_str(&s));
        match loaded {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "using fallback captions");
                Self::fallback()
            }
        }
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> ArchiveResult<&[String]> {
        pick_one(rng, &self.groups, "caption set").map(Vec::as_slice)
    }
}

impl Default for CaptionSet {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
