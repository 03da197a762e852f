//! The font interface table
//!
//! This is the whole contract a caller sees: one named, versioned table of
//! synchronous operations. Failures are reported through sentinels only;
//! there is no error code, no retry policy, no partial result.
//!
//! | Operation | Sentinel on failure |
//! |---|---|
//! | [`FontInterface::create`] | [`Resource::NULL`] |
//! | [`FontInterface::is_font`] | `false` |
//! | [`FontInterface::describe`] | `false` |
//! | [`FontInterface::draw_text_at`] | `false` |
//! | [`FontInterface::measure_text`] | [`INVALID_WIDTH`] |
//! | [`FontInterface::character_offset_for_pixel`] | [`INVALID_CHARACTER_OFFSET`] |
//! | [`FontInterface::pixel_offset_for_character`] | [`INVALID_WIDTH`] |

use crate::types::{FontDescription, FontMetrics, Module, Point, Rect, Resource, TextRun};

/// Family and version under which the table is published
pub const FONT_INTERFACE_NAME: &str = "PPB_Font;1";

/// Returned by width and pixel-offset queries that fail
pub const INVALID_WIDTH: i32 = -1;

/// Returned by character-offset queries that fail
pub const INVALID_CHARACTER_OFFSET: u32 = u32::MAX;

/// Font matching, metrics, measurement and drawing across the boundary
pub trait FontInterface: Send + Sync {
    /// Returns a font which best matches the description, or the null
    /// handle on failure.
    fn create(&self, module: Module, description: &FontDescription) -> Resource;

    /// Whether `resource` is a live font. False for invalid handles and for
    /// live handles of another kind.
    fn is_font(&self, resource: Resource) -> bool;

    /// Fill `description` and `metrics` with the values of the font that was
    /// actually selected.
    ///
    /// `description.face` must be `Undefined` or `Null` on input so no prior
    /// value is silently overwritten; otherwise nothing is written and the
    /// call returns false.
    fn describe(
        &self,
        font: Resource,
        description: &mut FontDescription,
        metrics: &mut FontMetrics,
    ) -> bool;

    /// Draw `text` into the image.
    ///
    /// `position` is the baseline of the left edge of the text, for both
    /// directions. With no clip, the text is clipped to the image. When
    /// `image_data_is_opaque` is set, subpixel antialiasing may be used.
    #[allow(clippy::too_many_arguments)]
    fn draw_text_at(
        &self,
        font: Resource,
        image_data: Resource,
        text: &TextRun,
        position: &Point,
        color: u32,
        clip: Option<&Rect>,
        image_data_is_opaque: bool,
    ) -> bool;

    /// Width of the whole shaped run in pixels. Shaping means this is not
    /// the sum of the widths of its parts.
    fn measure_text(&self, font: Resource, text: &TextRun) -> i32;

    /// Character index whose caret boundary is nearest to `pixel_position`,
    /// measured from the left edge of the run.
    fn character_offset_for_pixel(&self, font: Resource, text: &TextRun, pixel_position: i32)
        -> u32;

    /// Horizontal advance needed to reach `char_offset` when the run is
    /// drawn at the origin.
    fn pixel_offset_for_character(&self, font: Resource, text: &TextRun, char_offset: u32) -> i32;
}
