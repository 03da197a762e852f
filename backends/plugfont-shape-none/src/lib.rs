//! None Shaper - one glyph per character, advanced by its hmtx width
//!
//! No ligatures, no kerning, no marks. Useful when harfrust is unwanted or
//! as a reference for what shaping adds. Right-to-left runs are reversed so
//! the output is still in visual order.

use std::sync::Arc;

use plugfont_core::{
    error::Result,
    traits::{FontRef, Shaper},
    types::{PositionedGlyph, ShapedRun},
    ShapingParams,
};

/// A minimal shaper that maps characters straight to glyphs
pub struct NoneShaper;

impl NoneShaper {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl Shaper for NoneShaper {
    fn name(&self) -> &'static str {
        "none"
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapedRun> {
        log::debug!("NoneShaper: Shaping {} chars", text.chars().count());

        let scale = params.size / font.units_per_em().max(1) as f32;
        let mut logical: Vec<(u32, char)> = text
            .char_indices()
            .map(|(cluster, ch)| (cluster as u32, ch))
            .collect();
        if params.direction.is_rtl() {
            logical.reverse();
        }

        let mut glyphs = Vec::with_capacity(logical.len());
        let mut x_advance = 0.0;
        for (cluster, ch) in logical {
            // .notdef when the font has no glyph for it
            let glyph_id = font.glyph_id(ch).unwrap_or(0);
            let advance = font.advance_width(glyph_id) * scale;

            glyphs.push(PositionedGlyph {
                id: glyph_id,
                x: x_advance,
                y: 0.0,
                advance,
                cluster,
            });
            x_advance += advance;
        }

        let mut run = ShapedRun {
            glyphs,
            advance_width: x_advance,
            direction: params.direction,
        };
        run.apply_spacing(text, params.letter_spacing, params.word_spacing);
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugfont_core::types::Direction;

    // Mock font for testing
    struct MockFont;

    impl FontRef for MockFont {
        fn data(&self) -> &[u8] {
            &[]
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn glyph_id(&self, ch: char) -> Option<u32> {
            // ASCII characters map to their values
            if ch.is_ascii() {
                Some(ch as u32)
            } else {
                None
            }
        }

        fn advance_width(&self, glyph_id: u32) -> f32 {
            if glyph_id == 0 {
                250.0
            } else {
                500.0
            }
        }

        fn cache_id(&self) -> u64 {
            7
        }
    }

    #[test]
    fn test_basic_shaping() {
        let shaper = NoneShaper::new();
        let params = ShapingParams {
            size: 16.0,
            ..Default::default()
        };

        let result = shaper.shape("Hello", Arc::new(MockFont), &params).unwrap();

        assert_eq!(result.glyphs.len(), 5);
        assert_eq!(result.direction, Direction::LeftToRight);
        assert_eq!(result.advance_width, 40.0);
        for i in 1..result.glyphs.len() {
            assert!(result.glyphs[i].x > result.glyphs[i - 1].x);
        }
    }

    #[test]
    fn test_empty_text() {
        let result = NoneShaper::new()
            .shape("", Arc::new(MockFont), &ShapingParams::default())
            .unwrap();

        assert_eq!(result.glyphs.len(), 0);
        assert_eq!(result.advance_width, 0.0);
    }

    #[test]
    fn test_missing_glyph_uses_notdef() {
        let result = NoneShaper::new()
            .shape("aé", Arc::new(MockFont), &ShapingParams::default())
            .unwrap();
        assert_eq!(result.glyphs[1].id, 0);
        assert_eq!(result.glyphs[1].cluster, 1);
        assert_eq!(result.advance_width, 12.0);
    }

    #[test]
    fn test_rtl_reverses_into_visual_order() {
        let params = ShapingParams {
            direction: Direction::RightToLeft,
            ..Default::default()
        };
        let result = NoneShaper::new().shape("abc", Arc::new(MockFont), &params).unwrap();
        let clusters: Vec<u32> = result.glyphs.iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, vec![2, 1, 0]);
        assert_eq!(result.glyphs[0].x, 0.0);
    }

    #[test]
    fn test_word_spacing_only_after_spaces() {
        let params = ShapingParams {
            word_spacing: 3.0,
            ..Default::default()
        };
        let result = NoneShaper::new().shape("a b", Arc::new(MockFont), &params).unwrap();
        assert_eq!(result.advance_width, 27.0);
        assert_eq!(result.glyphs[2].x, 19.0);
    }
}
