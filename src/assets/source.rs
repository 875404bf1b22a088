use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::{
        catalog::SpriteKind,
        decode::{PreparedImage, decode_image},
    },
    foundation::error::{ArchiveError, ArchiveResult},
};

/// Resolves catalog paths to decoded images.
///
/// Implementations must be shareable across the loader's worker threads.
pub trait AssetSource: Send + Sync {
    /// Load and decode the image at catalog path `path`.
    fn load(&self, path: &str) -> ArchiveResult<PreparedImage>;
}

/// Reads assets from files under a root directory.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return root directory used when resolving relative asset paths.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_bytes(&self, norm_path: &str) -> ArchiveResult<Vec<u8>> {
        let path = self.root.join(Path::new(norm_path));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(ArchiveError::from)
    }
}

impl AssetSource for DirAssetSource {
    fn load(&self, path: &str) -> ArchiveResult<PreparedImage> {
        let norm = normalize_rel_path(path)?;
        let bytes = self.read_bytes(&norm)?;
        decode_image(&bytes)
    }
}

/// Load one sprite, turning any failure into an absent sprite.
pub fn load_optional(source: &dyn AssetSource, kind: SpriteKind, path: &str) -> Option<PreparedImage> {
    match source.load(path) {
        Ok(img) if !img.is_empty() => Some(img),
        Ok(_) => {
            tracing::warn!(kind = kind.label(), path, "asset has zero area, skipping");
            None
        }
        Err(err) => {
            tracing::warn!(kind = kind.label(), path, error = %err, "failed to load asset");
            None
        }
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ArchiveResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ArchiveError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(ArchiveError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ArchiveError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ArchiveError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
