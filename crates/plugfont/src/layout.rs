// this_file: crates/plugfont/src/layout.rs

//! One line of text, shaped and ready to measure, hit-test or draw
//!
//! The text is cut into directional runs which are shaped separately and
//! laid end to end in visual order. While doing so every cluster is turned
//! into caret units: a cluster covering several graphemes (a ligature, say)
//! is split evenly between them, so a caret can land inside it.

use std::ops::Range;

use plugfont_core::{
    error::{FontError, Result},
    traits::{GlyphPlacement, Shaper},
    types::{Direction, Point, ShapedRun},
};
use plugfont_unicode::{BidiRun, CharOffsets, TextSegmenter};

use crate::font::FontInstance;

/// A shaped directional run and where it sits on the line
#[derive(Debug, Clone)]
pub struct LayoutRun {
    /// Byte range in the line's text
    pub range: Range<usize>,
    /// Distance from the line's left edge to the run's left edge
    pub offset: f32,
    pub shaped: ShapedRun,
}

/// Smallest piece a caret can step over
#[derive(Debug, Clone, PartialEq)]
struct CaretUnit {
    chars: Range<usize>,
    left: f32,
    right: f32,
    rtl: bool,
}

impl CaretUnit {
    /// Character index of the caret on the unit's left edge
    fn left_index(&self) -> usize {
        if self.rtl {
            self.chars.end
        } else {
            self.chars.start
        }
    }

    fn right_index(&self) -> usize {
        if self.rtl {
            self.chars.start
        } else {
            self.chars.end
        }
    }
}

/// A laid-out line
#[derive(Debug, Clone)]
pub struct TextLayout {
    runs: Vec<LayoutRun>,
    /// Caret units sorted left to right
    units: Vec<CaretUnit>,
    /// Advance owned by each character; trailing characters of a grapheme own 0
    char_advances: Vec<f32>,
    width: f32,
}

impl TextLayout {
    /// Shape `text` with `font`
    ///
    /// `rtl` sets the paragraph direction. With `override_direction` the
    /// text is one run in that direction, no bidi analysis applied.
    pub fn new(
        text: &str,
        rtl: bool,
        override_direction: bool,
        font: &FontInstance,
        shaper: &dyn Shaper,
        segmenter: &TextSegmenter,
    ) -> Result<Self> {
        let offsets = CharOffsets::new(text);
        let base = if rtl {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };
        let graphemes = segmenter.grapheme_boundaries(text);

        let mut runs = Vec::new();
        let mut units = Vec::new();
        let mut pen = 0.0;
        for bidi_run in segmenter.visual_runs(text, base, override_direction) {
            let slice = &text[bidi_run.range.clone()];
            let params = font.shaping_params(bidi_run.direction);
            let shaped = shaper.shape(slice, font.font_ref(), &params)?;

            collect_units(&bidi_run, &shaped, pen, &graphemes, &offsets, &mut units);
            let advance = shaped.advance_width;
            runs.push(LayoutRun {
                range: bidi_run.range,
                offset: pen,
                shaped,
            });
            pen += advance;
        }
        units.sort_by(|a, b| a.left.total_cmp(&b.left));

        let mut char_advances = vec![0.0; offsets.len()];
        for unit in &units {
            if let Some(advance) = char_advances.get_mut(unit.chars.start) {
                *advance += unit.right - unit.left;
            }
        }

        Ok(Self {
            runs,
            units,
            char_advances,
            width: pen,
        })
    }

    pub fn runs(&self) -> &[LayoutRun] {
        &self.runs
    }

    /// Unrounded width of the line
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Number of characters in the laid-out text
    pub fn char_count(&self) -> usize {
        self.char_advances.len()
    }

    /// Advance needed to reach character `index`
    ///
    /// This is the sum of the advances of the characters before it in
    /// logical order, so `0` maps to 0 and `char_count()` to the full width.
    pub fn pixel_offset_for_character(&self, index: usize) -> Result<f32> {
        if index > self.char_advances.len() {
            return Err(FontError::OffsetOutOfRange {
                offset: index as u32,
                len: self.char_advances.len(),
            });
        }
        Ok(self.char_advances[..index].iter().sum())
    }

    /// Character index of the caret boundary nearest to `x`
    pub fn character_offset_for_pixel(&self, x: f32) -> usize {
        let (Some(first), Some(last)) = (self.units.first(), self.units.last()) else {
            return 0;
        };
        if x <= first.left {
            return first.left_index();
        }
        if x >= last.right {
            return last.right_index();
        }

        let index = self.units.partition_point(|unit| unit.right <= x);
        match self.units.get(index) {
            Some(unit) if x < (unit.left + unit.right) / 2.0 => unit.left_index(),
            Some(unit) => unit.right_index(),
            None => last.right_index(),
        }
    }

    /// Absolute glyph positions with the line's left baseline at `origin`
    pub fn placements(&self, origin: &Point) -> Vec<GlyphPlacement> {
        let (ox, oy) = (origin.x as f32, origin.y as f32);
        self.runs
            .iter()
            .flat_map(|run| {
                run.shaped.glyphs.iter().map(move |glyph| GlyphPlacement {
                    id: glyph.id,
                    x: ox + run.offset + glyph.x,
                    y: oy - glyph.y,
                })
            })
            .collect()
    }
}

/// Turn the glyph clusters of one shaped run into caret units
fn collect_units(
    run: &BidiRun,
    shaped: &ShapedRun,
    run_offset: f32,
    graphemes: &[usize],
    offsets: &CharOffsets,
    units: &mut Vec<CaretUnit>,
) {
    let run_len = run.len();
    let mut starts: Vec<usize> = shaped
        .glyphs
        .iter()
        .map(|glyph| glyph.cluster as usize)
        .filter(|cluster| *cluster < run_len)
        .collect();
    starts.sort_unstable();
    starts.dedup();

    let rtl = run.direction.is_rtl();
    let glyphs = &shaped.glyphs;
    let mut pen = 0.0;
    let mut i = 0;
    while i < glyphs.len() {
        let cluster = glyphs[i].cluster as usize;
        let left = pen;
        while i < glyphs.len() && glyphs[i].cluster as usize == cluster {
            pen += glyphs[i].advance;
            i += 1;
        }
        if cluster >= run_len {
            continue;
        }

        let end = starts
            .iter()
            .copied()
            .find(|start| *start > cluster)
            .unwrap_or(run_len);
        let (byte_start, byte_end) = (run.range.start + cluster, run.range.start + end);

        let mut cuts = vec![byte_start];
        cuts.extend(
            graphemes
                .iter()
                .copied()
                .filter(|boundary| *boundary > byte_start && *boundary < byte_end),
        );
        cuts.push(byte_end);

        let pieces = cuts.len() - 1;
        let share = (pen - left) / pieces as f32;
        for (k, piece) in cuts.windows(2).enumerate() {
            let slot = if rtl { pieces - 1 - k } else { k };
            let x = run_offset + left + share * slot as f32;
            units.push(CaretUnit {
                chars: offsets.char_at(piece[0])..offsets.char_at(piece[1]),
                left: x,
                right: x + share,
                rtl,
            });
        }
    }
}
