use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDateTime;

use crate::{
    foundation::error::{ArchiveError, ArchiveResult},
    foundation::math::rgba8_len,
    render::canvas::FrameRGBA,
};

/// `mars-archive-YYYYmmdd-HHMMSS-mmm.png` for the export instant `now`.
pub fn archive_file_name(now: NaiveDateTime) -> String {
    format!("mars-archive-{}.png", now.format("%Y%m%d-%H%M%S-%3f"))
}

/// Encode `frame` as a straight-alpha PNG in `dir`, returning the written path.
pub fn save_png(frame: &FrameRGBA, dir: &Path, now: NaiveDateTime) -> ArchiveResult<PathBuf> {
    let expected = rgba8_len(frame.width, frame.height)
        .ok_or_else(|| ArchiveError::validation("frame size overflow"))?;
    if frame.data.len() != expected {
        return Err(ArchiveError::validation(format!(
            "frame byte length {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;
    let path = dir.join(archive_file_name(now));

    image::save_buffer_with_format(
        &path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    tracing::info!(path = %path.display(), "postcard exported");
    Ok(path)
}
