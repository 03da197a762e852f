//! Pure Rust text shaping backend using harfrust
//!
//! Harfrust is a Rust port of HarfBuzz. It handles ligatures, kerning, mark
//! positioning and complex scripts without any C dependencies. One call here
//! shapes one directional run; bidi splitting happens before we are called.

use std::sync::Arc;

use harfrust::{
    Direction as HrDirection, Feature, FontRef as HrFontRef, GlyphBuffer, ShaperData, Tag,
    UnicodeBuffer,
};

use plugfont_core::{
    error::{Result, ShapingError},
    traits::{FontRef, Shaper},
    types::{Direction, PositionedGlyph, ShapedRun},
    ShapingParams,
};

/// Harfrust-backed shaper
#[derive(Debug, Default)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    pub fn new() -> Self {
        Self
    }

    fn to_hr_direction(dir: Direction) -> HrDirection {
        match dir {
            Direction::LeftToRight => HrDirection::LeftToRight,
            Direction::RightToLeft => HrDirection::RightToLeft,
        }
    }

    /// Parse a 4-character tag string into a harfrust Tag
    fn parse_tag(tag_str: &str) -> Option<Tag> {
        let bytes: [u8; 4] = tag_str.as_bytes().try_into().ok()?;
        Some(Tag::new(&bytes))
    }

    /// Extract positioned glyphs from harfrust's GlyphBuffer
    ///
    /// Harfrust already emits glyphs in visual order for both directions.
    fn extract_glyphs(buffer: &GlyphBuffer, ppem: f32, upem: u16) -> (Vec<PositionedGlyph>, f32) {
        let scale = ppem / upem.max(1) as f32;
        let mut glyphs = Vec::with_capacity(buffer.len());
        let mut pen = 0.0;

        for (info, pos) in buffer.glyph_infos().iter().zip(buffer.glyph_positions()) {
            glyphs.push(PositionedGlyph {
                id: info.glyph_id,
                x: pen + pos.x_offset as f32 * scale,
                y: pos.y_offset as f32 * scale,
                advance: pos.x_advance as f32 * scale,
                cluster: info.cluster,
            });
            pen += pos.x_advance as f32 * scale;
        }

        (glyphs, pen)
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "harfrust"
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapedRun> {
        if text.is_empty() {
            return Ok(ShapedRun::empty(params.direction));
        }

        let hr_font = HrFontRef::from_index(font.data(), font.face_index())
            .map_err(|_| ShapingError::InvalidFont)?;

        // ShaperData caches lookup tables; building it is the costly part
        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data
            .shaper(&hr_font)
            .point_size(Some(params.size))
            .build();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(Self::to_hr_direction(params.direction));
        buffer.guess_segment_properties();

        let features: Vec<Feature> = params
            .features
            .iter()
            .filter_map(|(name, value)| {
                let tag = Self::parse_tag(name);
                if tag.is_none() {
                    log::warn!("Ignoring malformed feature tag {:?}", name);
                }
                tag.map(|tag| Feature {
                    tag,
                    value: *value,
                    start: 0,
                    end: u32::MAX,
                })
            })
            .collect();

        let output = shaper.shape(buffer, &features);
        let (glyphs, advance_width) =
            Self::extract_glyphs(&output, params.size, font.units_per_em());

        let mut run = ShapedRun {
            glyphs,
            advance_width,
            direction: params.direction,
        };
        run.apply_spacing(text, params.letter_spacing, params.word_spacing);

        log::trace!(
            "Shaped {} bytes into {} glyphs, {:.2}px",
            text.len(),
            run.glyphs.len(),
            run.advance_width
        );
        Ok(run)
    }
}
