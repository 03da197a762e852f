//! Font discovery, matching and metrics for plugfont
//!
//! [`FontMatcher`] wraps a `fontdb` database and turns a
//! [`FontDescription`](plugfont_core::FontDescription) into a loaded
//! [`Face`]. [`ScaledMetrics`] reads the face's tables at a pixel size.

pub mod face;
pub mod matcher;
pub mod metrics;

pub use face::Face;
pub use matcher::{FontMatcher, MatchedFace};
pub use metrics::ScaledMetrics;
