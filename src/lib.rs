#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod effects;
pub mod export;
mod foundation;
pub mod layout;
pub mod pipeline;
pub mod random;
pub mod render;

pub use assets::catalog::{AssetCatalog, SpriteKind};
pub use assets::decode::{PreparedImage, decode_image};
pub use assets::source::{AssetSource, DirAssetSource};
pub use config::{ArchiveConfig, CaptionSet, Style};
pub use export::{archive_file_name, save_png};
pub use foundation::core::{Affine, CanvasSize, Point, Rect, Rgba8, Size, Vec2};
pub use foundation::error::{ArchiveError, ArchiveResult};
pub use pipeline::studio::{
    GenerationOutcome, GenerationState, LoadedPass, PassPlan, Studio, load_pass,
};
pub use render::canvas::{Canvas, FrameRGBA};
pub use render::stamp::format_archive_date;
