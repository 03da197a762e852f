// this_file: crates/plugfont-unicode/src/lib.rs

//! Unicode analysis the host needs before and after shaping.
//!
//! Two questions get answered here: which stretches of a text run flow in
//! which direction (and in what visual order), and where a caret may sit.

use std::ops::Range;

use icu_segmenter::GraphemeClusterSegmenter;
use plugfont_core::types::Direction;
use unicode_bidi::{BidiInfo, Level};

/// A directional run, as a byte range of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    pub range: Range<usize>,
    pub direction: Direction,
}

impl BidiRun {
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.start >= self.range.end
    }
}

/// Splits text into directional runs and caret boundaries
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSegmenter;

impl TextSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Directional runs of `text`, left to right on screen
    ///
    /// With `override_direction` the whole text is one run in `base`
    /// direction, whatever its characters say. Otherwise the Unicode
    /// bidi algorithm resolves levels with `base` as the paragraph level.
    pub fn visual_runs(
        &self,
        text: &str,
        base: Direction,
        override_direction: bool,
    ) -> Vec<BidiRun> {
        if text.is_empty() {
            return Vec::new();
        }

        if override_direction {
            return vec![BidiRun {
                range: 0..text.len(),
                direction: base,
            }];
        }

        let level = if base.is_rtl() {
            Level::rtl()
        } else {
            Level::ltr()
        };
        let bidi = BidiInfo::new(text, Some(level));

        let mut runs = Vec::new();
        for paragraph in &bidi.paragraphs {
            let line = paragraph.range.clone();
            let (levels, level_runs) = bidi.visual_runs(paragraph, line);

            for run in level_runs {
                if run.start >= run.end {
                    continue;
                }
                let level = levels.get(run.start).copied().unwrap_or(paragraph.level);
                let direction = if level.is_rtl() {
                    Direction::RightToLeft
                } else {
                    Direction::LeftToRight
                };
                runs.push(BidiRun {
                    range: run,
                    direction,
                });
            }
        }

        if runs.is_empty() {
            runs.push(BidiRun {
                range: 0..text.len(),
                direction: base,
            });
        }

        log::trace!("{} bidi runs for {} bytes", runs.len(), text.len());
        runs
    }

    /// Byte offsets where a caret may sit, including 0 and `text.len()`
    pub fn grapheme_boundaries(&self, text: &str) -> Vec<usize> {
        if text.is_empty() {
            return vec![0];
        }
        GraphemeClusterSegmenter::new().segment_str(text).collect()
    }
}

/// Conversion between byte offsets and character (scalar value) indices
///
/// Built once per text so repeated lookups stay cheap.
#[derive(Debug, Clone)]
pub struct CharOffsets {
    /// Byte offset of every character, plus `text.len()` at the end
    starts: Vec<usize>,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        let mut starts: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        starts.push(text.len());
        Self { starts }
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte offset of character `index`; `index == len()` maps to the text length
    pub fn byte_of(&self, index: usize) -> Option<usize> {
        self.starts.get(index).copied()
    }

    /// Index of the character containing byte `offset`
    pub fn char_at(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_runs() {
        let segmenter = TextSegmenter::new();
        assert!(segmenter
            .visual_runs("", Direction::LeftToRight, false)
            .is_empty());
        assert_eq!(segmenter.grapheme_boundaries(""), vec![0]);
    }

    #[test]
    fn test_latin_is_single_ltr_run() {
        let runs = TextSegmenter::new().visual_runs("Hello World", Direction::LeftToRight, false);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].range, 0..11);
        assert_eq!(runs[0].direction, Direction::LeftToRight);
    }

    #[test]
    fn test_mixed_text_splits_into_runs() {
        let text = "Hello שלום";
        let runs = TextSegmenter::new().visual_runs(text, Direction::LeftToRight, false);
        assert!(runs.len() >= 2);
        assert_eq!(runs[0].direction, Direction::LeftToRight);
        let last = runs.last().unwrap();
        assert_eq!(last.direction, Direction::RightToLeft);
        assert_eq!(&text[last.range.clone()], "שלום");
    }

    #[test]
    fn test_rtl_base_puts_latin_run_on_the_right() {
        let text = "abc אבג";
        let runs = TextSegmenter::new().visual_runs(text, Direction::RightToLeft, false);
        assert!(runs.len() >= 2);
        assert_eq!(runs[0].direction, Direction::RightToLeft);
        assert_eq!(runs.last().unwrap().direction, Direction::LeftToRight);
    }

    #[test]
    fn test_override_forces_single_run() {
        let runs = TextSegmenter::new().visual_runs("abc אבג", Direction::RightToLeft, true);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].direction, Direction::RightToLeft);
        assert_eq!(runs[0].len(), "abc אבג".len());
    }

    #[test]
    fn test_grapheme_boundaries_skip_combining_marks() {
        let text = "e\u{301}x";
        let boundaries = TextSegmenter::new().grapheme_boundaries(text);
        assert_eq!(boundaries, vec![0, 3, 4]);
    }

    #[test]
    fn test_char_byte_mapping() {
        let offsets = CharOffsets::new("aé😀");
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets.byte_of(0), Some(0));
        assert_eq!(offsets.byte_of(2), Some(3));
        assert_eq!(offsets.byte_of(3), Some(7));
        assert_eq!(offsets.byte_of(4), None);
        assert_eq!(offsets.char_at(3), 2);
        assert_eq!(offsets.char_at(4), 2);
        assert_eq!(offsets.char_at(7), 3);
        assert!(CharOffsets::new("").is_empty());
    }
}
