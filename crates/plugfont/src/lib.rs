//! plugfont - fonts for code on the other side of a boundary
//!
//! A caller holding only opaque handles asks for a font that matches a
//! description, reads its metrics, measures and hit-tests text runs, and
//! draws them into image buffers. [`FontHost`] answers all of it:
//!
//! 1. Matching: `fontdb` finds the best installed face (face name, then
//!    generic family, then anything close).
//! 2. Bidi: text is cut into directional runs in visual order.
//! 3. Shaping: harfrust (or the plain cmap shaper) positions glyphs.
//! 4. Drawing: zeno rasterizes outlines into the target image.
//!
//! # Example
//!
//! ```rust,no_run
//! use plugfont::{FontDescription, FontHost, FontInterface, Module, TextRun, FONT_INTERFACE_NAME};
//!
//! let host = FontHost::new()?;
//! let fonts = host.interface(FONT_INTERFACE_NAME).expect("published");
//!
//! let font = fonts.create(Module(1), &FontDescription::default());
//! let width = fonts.measure_text(font, &TextRun::new("Hello"));
//! assert!(width > 0);
//! # Ok::<(), plugfont::FontError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `shaping-hr`: harfrust shaping (default; otherwise the none shaper)
//! - `render-zeno`: zeno rasterizer (default; without it drawing fails)

pub mod builder;
pub mod font;
pub mod host;
pub mod layout;
pub mod resource;

pub use builder::FontHostBuilder;
pub use font::FontInstance;
pub use host::FontHost;
pub use layout::{LayoutRun, TextLayout};
pub use resource::{ResourceKind, ResourceTracker};

pub use plugfont_core::{
    error, traits, types, Color, FontDescription, FontError, FontFamily, FontInterface,
    FontMetrics, FontWeight, HostConfig, ImageData, ImageDataDesc, ImageDataFormat, Module,
    Point, Rect, Resource, Result, Size, TextRun, Var, FONT_INTERFACE_NAME,
    INVALID_CHARACTER_OFFSET, INVALID_WIDTH,
};

pub use plugfont_fontdb as fontdb;
pub use plugfont_shape_none as shape_none;
pub use plugfont_unicode as unicode;

#[cfg(feature = "shaping-hr")]
pub use plugfont_shape_hr as shape_hr;

#[cfg(feature = "render-zeno")]
pub use plugfont_render_zeno as render_zeno;
