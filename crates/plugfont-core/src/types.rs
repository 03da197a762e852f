//! Plain values that cross the interface boundary
//!
//! Everything here is a transient payload: built by the caller, read or
//! filled by the host during a single call, and then forgotten. The only
//! thing with a lifecycle is [`Resource`], and the host owns that.

use std::fmt;

/// Opaque handle referencing a host-owned resource
///
/// Zero is never handed out and doubles as the failure sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Resource(pub u32);

impl Resource {
    /// The null handle, returned when creation fails
    pub const NULL: Resource = Resource(0);

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of the calling module; resources remember who created them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Module(pub u32);

/// Caller-side variant value
///
/// Faces and text payloads travel as variants so the caller can pass "no
/// value" (`Null`/`Undefined`) where a string is optional.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Var {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int32(i32),
    Double(f64),
    String(String),
}

impl Var {
    /// True for `Undefined` and `Null`, the two "nothing here" values
    pub fn is_empty_slot(&self) -> bool {
        matches!(self, Var::Undefined | Var::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Var::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, for logs
    pub fn type_name(&self) -> &'static str {
        match self {
            Var::Undefined => "undefined",
            Var::Null => "null",
            Var::Bool(_) => "bool",
            Var::Int32(_) => "int32",
            Var::Double(_) => "double",
            Var::String(_) => "string",
        }
    }
}

impl From<&str> for Var {
    fn from(value: &str) -> Self {
        Var::String(value.to_string())
    }
}

impl From<String> for Var {
    fn from(value: String) -> Self {
        Var::String(value)
    }
}

/// Generic family used when no face name is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum FontFamily {
    /// The user's default page font (normally serif or sans-serif)
    #[default]
    Default = 0,
    Serif = 1,
    SansSerif = 2,
    Monospace = 3,
}

impl FontFamily {
    /// Parse the CSS generic family keywords
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Some(FontFamily::Default),
            "serif" => Some(FontFamily::Serif),
            "sans-serif" | "sans" | "sansserif" => Some(FontFamily::SansSerif),
            "monospace" | "mono" => Some(FontFamily::Monospace),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::Default => "default",
            FontFamily::Serif => "serif",
            FontFamily::SansSerif => "sans-serif",
            FontFamily::Monospace => "monospace",
        }
    }
}

/// Font weight on the nine-step scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u32)]
pub enum FontWeight {
    W100 = 0,
    W200,
    W300,
    #[default]
    W400,
    W500,
    W600,
    W700,
    W800,
    W900,
}

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight::W400;
    pub const BOLD: FontWeight = FontWeight::W700;

    const ALL: [FontWeight; 9] = [
        FontWeight::W100,
        FontWeight::W200,
        FontWeight::W300,
        FontWeight::W400,
        FontWeight::W500,
        FontWeight::W600,
        FontWeight::W700,
        FontWeight::W800,
        FontWeight::W900,
    ];

    /// CSS numeric weight (100..=900)
    pub fn to_css(self) -> u16 {
        (self as u16 + 1) * 100
    }

    /// Nearest step for a CSS numeric weight; out-of-range values clamp
    pub fn from_css(weight: u16) -> Self {
        let step = (weight.clamp(100, 900) + 50) / 100;
        Self::ALL[(step - 1).min(8) as usize]
    }

    pub fn is_bold(self) -> bool {
        self >= FontWeight::W600
    }
}

/// What the caller asks for, and what the host reports back
///
/// The same structure is used as the request to `create` and as the
/// resolved description filled in by `describe`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontDescription {
    /// Face name; null or undefined means "use `family`"
    pub face: Var,
    /// Generic family, ignored when `face` names a face
    pub family: FontFamily,
    /// Pixel size; 0 picks the host default
    pub size: u32,
    pub weight: FontWeight,
    pub italic: bool,
    pub small_caps: bool,
    /// Extra pixels between letters (negative tightens)
    pub letter_spacing: i32,
    /// Extra pixels between words (negative tightens)
    pub word_spacing: i32,
}

impl FontDescription {
    /// Requested face name, if the caller gave a non-empty one
    pub fn face_name(&self) -> Option<&str> {
        self.face.as_str().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Derived metrics of a resolved font, in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    pub height: i32,
    pub ascent: i32,
    pub descent: i32,
    pub line_spacing: i32,
    pub x_height: i32,
    pub average_char_width: i32,
}

/// Text plus its directional metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Must be a string, or null for empty text
    pub text: Var,
    /// Base direction is right-to-left
    pub rtl: bool,
    /// Force `rtl` for the whole run regardless of content
    pub override_direction: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Var::String(text.into()),
            rtl: false,
            override_direction: false,
        }
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn override_direction(mut self, override_direction: bool) -> Self {
        self.override_direction = override_direction;
        self
    }

    /// The text payload, or `None` when the variant is not usable as text
    pub fn text(&self) -> Option<&str> {
        match &self.text {
            Var::String(s) => Some(s),
            Var::Null => Some(""),
            _ => None,
        }
    }
}

impl Default for TextRun {
    fn default() -> Self {
        Self {
            text: Var::Null,
            rtl: false,
            override_direction: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub point: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            point: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.point.x.saturating_add(self.size.width)
    }

    pub fn bottom(&self) -> i32 {
        self.point.y.saturating_add(self.size.height)
    }

    /// Overlap of two rectangles; empty rectangles come back as `None`
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.point.x.max(other.point.x);
        let y0 = self.point.y.max(other.point.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Straight-alpha RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    /// Unpack a `0xAARRGGBB` colour
    pub const fn from_argb(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Unique identifier for a glyph within a font
pub type GlyphId = u32;

/// Which way a shaped run flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn is_rtl(self) -> bool {
        self == Direction::RightToLeft
    }
}

/// A glyph that knows where it sits inside its run
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGlyph {
    pub id: GlyphId,
    /// Pen position from the visual left edge of the run, in pixels
    pub x: f32,
    /// Vertical offset from the baseline, y-up, in pixels
    pub y: f32,
    pub advance: f32,
    /// Byte offset of the glyph's cluster in the run text
    pub cluster: u32,
}

/// Glyphs in visual order plus the run's total advance
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapedRun {
    pub glyphs: Vec<PositionedGlyph>,
    pub advance_width: f32,
    pub direction: Direction,
}

impl ShapedRun {
    pub fn empty(direction: Direction) -> Self {
        Self {
            glyphs: Vec::new(),
            advance_width: 0.0,
            direction,
        }
    }

    /// Add letter and word spacing after shaping
    ///
    /// Letter spacing lands after every cluster, word spacing after every
    /// cluster that starts with a space. Glyph positions are rebuilt from the
    /// adjusted advances so the run stays contiguous.
    pub fn apply_spacing(&mut self, text: &str, letter_spacing: f32, word_spacing: f32) {
        if self.glyphs.is_empty() || (letter_spacing == 0.0 && word_spacing == 0.0) {
            return;
        }

        let len = self.glyphs.len();
        let mut old_pen = 0.0f32;
        let mut new_pen = 0.0f32;
        for i in 0..len {
            let cluster = self.glyphs[i].cluster;
            // The visually last glyph of a cluster carries the extra space
            let ends_cluster = i + 1 == len || self.glyphs[i + 1].cluster != cluster;

            let glyph = &mut self.glyphs[i];
            let offset = glyph.x - old_pen;
            old_pen += glyph.advance;
            glyph.x = new_pen + offset;

            if ends_cluster {
                let is_space = text
                    .get(cluster as usize..)
                    .and_then(|rest| rest.chars().next())
                    .is_some_and(|ch| ch == ' ' || ch == '\u{00A0}');
                glyph.advance += letter_spacing;
                if is_space {
                    glyph.advance += word_spacing;
                }
            }
            new_pen += glyph.advance;
        }
        self.advance_width = new_pen;
    }
}

/// How glyph coverage is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AntialiasMode {
    /// Binary coverage
    None,
    #[default]
    Grayscale,
    /// Per-channel LCD coverage; only valid on opaque targets
    Subpixel,
}

/// How shaping should behave
#[derive(Debug, Clone, PartialEq)]
pub struct ShapingParams {
    pub size: f32,
    pub direction: Direction,
    pub features: Vec<(String, u32)>,
    pub letter_spacing: f32,
    pub word_spacing: f32,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            size: 16.0,
            direction: Direction::LeftToRight,
            features: Vec::new(),
            letter_spacing: 0.0,
            word_spacing: 0.0,
        }
    }
}

/// How glyphs should be drawn into an image
#[derive(Debug, Clone, PartialEq)]
pub struct DrawParams {
    pub size: f32,
    pub color: Color,
    pub antialias: AntialiasMode,
    /// Pixels outside this rectangle are never touched
    pub clip: Rect,
    pub synthetic_bold: bool,
    pub synthetic_oblique: bool,
}
