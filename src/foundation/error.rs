/// Convenience result type used across the crate.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    /// Invalid caller-provided geometry, sizes or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// A random selection was requested from an empty set.
    #[error("empty input: cannot pick from an empty {0}")]
    EmptyInput(&'static str),

    /// Errors while resolving or decoding image and font assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors raised by a drawing step.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when reading or parsing configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArchiveError {
    /// Build an [`ArchiveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ArchiveError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build an [`ArchiveError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`ArchiveError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
