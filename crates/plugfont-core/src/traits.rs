//! The seams the host is assembled from
//!
//! - [`FontRef`] - Your window into font data and metrics
//! - [`Shaper`] - Where characters become positioned glyphs
//! - [`Rasterizer`] - Where positioned glyphs become pixels
//!
//! A host picks one implementation of each; the interface table in
//! [`crate::interface`] never sees which.

use std::sync::Arc;

use crate::{
    error::Result,
    image::ImageData,
    types::{DrawParams, GlyphId, ShapedRun, ShapingParams},
};

/// Your key to unlocking font secrets
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         1000
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(42)
///     }
///
///     fn advance_width(&self, glyph_id: GlyphId) -> f32 {
///         500.0
///     }
///
///     fn cache_id(&self) -> u64 {
///         7
///     }
/// }
/// ```
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// Which face inside a collection file
    fn face_index(&self) -> u32 {
        0
    }

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// How wide this glyph stands in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// How many glyphs this font contains
    fn glyph_count(&self) -> Option<u32> {
        None
    }

    /// Stable identity of the face, used as a cache key
    fn cache_id(&self) -> u64;
}

/// Where characters learn their positions
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Shape one directional run into glyphs in visual order
    ///
    /// Cluster values are byte offsets into `text`.
    fn shape(&self, text: &str, font: Arc<dyn FontRef>, params: &ShapingParams)
        -> Result<ShapedRun>;

    /// Flush any cached shaping data
    fn clear_cache(&self) {}
}

/// Where glyphs become visible
pub trait Rasterizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Draw glyphs whose `x`/`y` are absolute baseline positions in `target`
    ///
    /// Only pixels inside `params.clip` may change.
    fn draw(
        &self,
        glyphs: &[GlyphPlacement],
        font: Arc<dyn FontRef>,
        params: &DrawParams,
        target: &mut ImageData,
    ) -> Result<()>;

    /// Free up rendering resources
    fn clear_cache(&self) {}
}

/// A glyph pinned to an absolute position in the target image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub id: GlyphId,
    /// Pen x in image pixels
    pub x: f32,
    /// Baseline y in image pixels, y-down
    pub y: f32,
}
