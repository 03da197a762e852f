//! Error types for plugfont
//!
//! The interface boundary only ever reports sentinels. Everything behind it
//! speaks [`FontError`], so the reason is available to logs and to callers
//! that use the host directly.

use thiserror::Error;

use crate::types::Resource;

pub type Result<T> = std::result::Result<T, FontError>;

/// Main error type for plugfont
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Invalid resource: {0}")]
    InvalidResource(Resource),

    #[error("Resource {resource} is a {actual}, expected a {expected}")]
    WrongResourceKind {
        resource: Resource,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Text must be a string or null, got {0}")]
    InvalidText(&'static str),

    #[error("Output description slot must be empty, got {0}")]
    SlotNotEmpty(&'static str),

    #[error("Font size {0} is outside 1..=65535")]
    InvalidSize(u32),

    #[error("No font matches the description: {0}")]
    NoMatchingFont(String),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Shaping failed: {0}")]
    Shaping(#[from] ShapingError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Character offset {offset} out of range for text of {len} characters")]
    OffsetOutOfRange { offset: u32, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Face {0} has no data")]
    FaceDataUnavailable(String),
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Font data could not be parsed for shaping")]
    InvalidFont,

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Font data could not be parsed for rendering")]
    InvalidFont,

    #[error("Glyph {0} has no outline")]
    GlyphNotFound(u32),

    #[error("Outline extraction failed")]
    OutlineExtractionFailed,

    #[error("Backend error: {0}")]
    BackendError(String),
}
