//! Plugfont Core: the font interface contract and the seams behind it
//!
//! A caller on the far side of a trust boundary asks for fonts, metrics,
//! measurements and drawn text. It never sees how any of that is done. This
//! crate holds both halves of that arrangement:
//!
//! - The contract: [`FontInterface`], published under
//!   [`FONT_INTERFACE_NAME`], and the plain values in [`types`] that travel
//!   through it.
//! - The seams a host is built from: [`FontRef`], [`Shaper`] and
//!   [`Rasterizer`], plus the shared [`error`], [`config`] and
//!   [`shaping_cache`] plumbing.
//!
//! ## Talking to a host
//!
//! ```rust,no_run
//! use plugfont_core::{FontDescription, FontInterface, Module, TextRun};
//!
//! fn width_of(table: &dyn FontInterface, text: &str) -> i32 {
//!     let font = table.create(Module(1), &FontDescription::default());
//!     if font.is_null() {
//!         return -1;
//!     }
//!     table.measure_text(font, &TextRun::new(text))
//! }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod interface;
pub mod shaping_cache;
pub mod traits;
pub mod types;

pub use config::HostConfig;
pub use error::{FontError, Result};
pub use image::{ImageData, ImageDataDesc, ImageDataFormat};
pub use interface::{
    FontInterface, FONT_INTERFACE_NAME, INVALID_CHARACTER_OFFSET, INVALID_WIDTH,
};
pub use traits::{FontRef, GlyphPlacement, Rasterizer, Shaper};
pub use types::{
    AntialiasMode, Color, Direction, DrawParams, FontDescription, FontFamily, FontMetrics,
    FontWeight, GlyphId, Module, Point, PositionedGlyph, Rect, Resource, ShapedRun,
    ShapingParams, Size, TextRun, Var,
};
