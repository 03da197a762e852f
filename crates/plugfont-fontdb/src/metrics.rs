// this_file: crates/plugfont-fontdb/src/metrics.rs

//! Pixel metrics of a face at a given size

use skrifa::instance::{LocationRef, Size};
use skrifa::MetadataProvider;

use plugfont_core::{error::FontLoadError, FontMetrics, Result};

use crate::face::Face;

/// Floating point metrics, before rounding to the interface's integers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledMetrics {
    pub size: f32,
    /// Above the baseline, positive
    pub ascent: f32,
    /// Below the baseline, positive
    pub descent: f32,
    pub leading: f32,
    pub x_height: f32,
    pub average_char_width: f32,
}

impl ScaledMetrics {
    /// Read metrics from the face's tables, scaled to `size` pixels
    ///
    /// x-height and average width fall back to glyph measurements when the
    /// OS/2 table does not carry them.
    pub fn compute(face: &Face, size: f32) -> Result<Self> {
        let font = face.skrifa_ref().ok_or(FontLoadError::InvalidData)?;
        let px = Size::new(size);
        let metrics = font.metrics(px, LocationRef::default());
        let glyph_metrics = font.glyph_metrics(px, LocationRef::default());
        let charmap = font.charmap();

        let x_height = metrics
            .x_height
            .filter(|h| *h > 0.0)
            .or_else(|| {
                let gid = charmap.map('x')?;
                glyph_metrics.bounds(gid).map(|b| b.y_max)
            })
            .unwrap_or(size * 0.5);

        let average_char_width = metrics
            .average_width
            .filter(|w| *w > 0.0)
            .or_else(|| {
                let gid = charmap.map('0')?;
                glyph_metrics.advance_width(gid)
            })
            .unwrap_or(size * 0.5);

        Ok(Self {
            size,
            ascent: metrics.ascent,
            descent: -metrics.descent,
            leading: metrics.leading.max(0.0),
            x_height,
            average_char_width,
        })
    }

    /// Round into the interface representation
    pub fn to_font_metrics(&self) -> FontMetrics {
        let ascent = self.ascent.round() as i32;
        let descent = self.descent.round() as i32;
        let height = ascent.saturating_add(descent);
        let line_spacing = (self.ascent + self.descent + self.leading).round() as i32;
        FontMetrics {
            height,
            ascent,
            descent,
            // Separate rounding can push height one pixel past the line
            line_spacing: line_spacing.max(height),
            x_height: self.x_height.round() as i32,
            average_char_width: self.average_char_width.round() as i32,
        }
    }
}
