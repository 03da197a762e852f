//! Zeno Renderer - glyph outlines straight into a host image
//!
//! Outlines come out of skrifa in font units, get cached per face, and are
//! mapped into image space for every draw: scaled to the pixel size, flipped
//! to y-down, slanted for synthetic oblique and placed on the baseline. Zeno
//! turns each placed outline into a coverage mask that is blended into the
//! target, never outside the clip rectangle.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::MetadataProvider;
use zeno::{Command, Format, Mask};

use plugfont_core::{
    config::MAX_FONT_SIZE,
    error::{RenderError, Result},
    image::ImageData,
    traits::{FontRef, GlyphPlacement, Rasterizer},
    types::{AntialiasMode, DrawParams, GlyphId, Rect},
};

/// Horizontal shear used for synthetic oblique, about 12 degrees
const OBLIQUE_SKEW: f32 = 0.21;

/// Outlines kept around between draws
const OUTLINE_CACHE_CAPACITY: usize = 1024;

/// Rasterizer built on zeno's scanline coverage masks
pub struct ZenoRasterizer {
    outlines: Mutex<LruCache<(u64, GlyphId), Arc<Vec<Command>>>>,
}

impl ZenoRasterizer {
    pub fn new() -> Self {
        Self::with_cache_capacity(OUTLINE_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            outlines: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached outlines
    pub fn cached_outlines(&self) -> usize {
        self.outlines.lock().len()
    }

    /// Unscaled outline of a glyph, y-up, from the cache when possible
    fn outline(&self, font: &Arc<dyn FontRef>, glyph_id: GlyphId) -> Result<Arc<Vec<Command>>> {
        let key = (font.cache_id(), glyph_id);
        if let Some(commands) = self.outlines.lock().get(&key) {
            return Ok(Arc::clone(commands));
        }

        let font_ref = skrifa::FontRef::from_index(font.data(), font.face_index())
            .map_err(|_| RenderError::InvalidFont)?;
        let glyph = font_ref
            .outline_glyphs()
            .get(skrifa::GlyphId::new(glyph_id))
            .ok_or(RenderError::GlyphNotFound(glyph_id))?;

        let mut commands = Vec::new();
        let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
        glyph
            .draw(settings, &mut ZenoPen::new(&mut commands))
            .map_err(|_| RenderError::OutlineExtractionFailed)?;

        let commands = Arc::new(commands);
        self.outlines.lock().put(key, Arc::clone(&commands));
        Ok(commands)
    }

    /// Draw one glyph outline into `target`, restricted to `clip`
    fn draw_glyph(
        &self,
        outline: &[Command],
        placement: &GlyphPlacement,
        scale: f32,
        params: &DrawParams,
        clip: &Rect,
        target: &mut ImageData,
    ) {
        if outline.is_empty() {
            return;
        }

        let skew = if params.synthetic_oblique {
            OBLIQUE_SKEW
        } else {
            0.0
        };
        let mut path = Vec::with_capacity(outline.len() * 2);
        append_placed(&mut path, outline, scale, skew, placement.x, placement.y);
        if params.synthetic_bold {
            // A second copy, shifted right; nonzero fill merges the two
            let embolden = (params.size / 24.0).max(0.5);
            append_placed(
                &mut path,
                outline,
                scale,
                skew,
                placement.x + embolden,
                placement.y,
            );
        }

        let subpixel = params.antialias == AntialiasMode::Subpixel;
        let format = if subpixel {
            Format::Subpixel
        } else {
            Format::Alpha
        };
        let Some(bounds) = path_bounds(&path) else {
            return;
        };
        // Only the part of the glyph inside the clip gets a mask
        let left = (bounds.0.floor() as i32).max(clip.point.x);
        let top = (bounds.1.floor() as i32).max(clip.point.y);
        let right = (bounds.2.ceil() as i32).min(clip.right());
        let bottom = (bounds.3.ceil() as i32).min(clip.bottom());
        if left >= right || top >= bottom {
            return;
        }

        let width = (right - left) as u32;
        let height = (bottom - top) as u32;
        let bytes_per_pixel = if subpixel { 4 } else { 1 };
        let mut coverage = vec![0u8; width as usize * height as usize * bytes_per_pixel];
        Mask::new(&path[..])
            .format(format)
            .size(width, height)
            .offset((-left, -top))
            .render_into(&mut coverage, None);

        for py in top..bottom {
            for px in left..right {
                let mx = (px - left) as usize;
                let my = (py - top) as usize;
                let idx = (my * width as usize + mx) * bytes_per_pixel;
                if subpixel {
                    let Some(rgb) = coverage.get(idx..idx + 3) else {
                        continue;
                    };
                    if rgb.iter().all(|c| *c == 0) {
                        continue;
                    }
                    target.blend_subpixel_coverage(
                        px as u32,
                        py as u32,
                        params.color,
                        [rgb[0], rgb[1], rgb[2]],
                    );
                } else {
                    let Some(&alpha) = coverage.get(idx) else {
                        continue;
                    };
                    let alpha = match params.antialias {
                        AntialiasMode::None if alpha >= 128 => 255,
                        AntialiasMode::None => 0,
                        _ => alpha,
                    };
                    if alpha > 0 {
                        target.blend_coverage(px as u32, py as u32, params.color, alpha);
                    }
                }
            }
        }
    }
}

impl Default for ZenoRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ZenoRasterizer {
    fn name(&self) -> &'static str {
        "zeno"
    }

    fn draw(
        &self,
        glyphs: &[GlyphPlacement],
        font: Arc<dyn FontRef>,
        params: &DrawParams,
        target: &mut ImageData,
    ) -> Result<()> {
        if params.size <= 0.0 || params.size > MAX_FONT_SIZE as f32 {
            let size = params.size.max(0.0) as u32;
            return Err(RenderError::InvalidDimensions {
                width: size,
                height: size,
            }
            .into());
        }

        let Some(clip) = params.clip.intersect(&target.bounds()) else {
            log::debug!("Zeno: clip {:?} misses the image, nothing to draw", params.clip);
            return Ok(());
        };

        let scale = params.size / font.units_per_em().max(1) as f32;
        let mut drawn = 0usize;
        let mut last_error = None;

        for placement in glyphs {
            match self.outline(&font, placement.id) {
                Ok(outline) => {
                    self.draw_glyph(&outline, placement, scale, params, &clip, target);
                    drawn += 1;
                },
                Err(err) => {
                    log::warn!("Zeno: failed to draw glyph {}: {}", placement.id, err);
                    last_error = Some(err);
                },
            }
        }

        // A run where nothing could be drawn is a failure; a few bad glyphs are not
        match last_error {
            Some(err) if drawn == 0 => Err(err),
            _ => Ok(()),
        }
    }

    fn clear_cache(&self) {
        self.outlines.lock().clear();
    }
}

/// Map an outline from font units into image space and append it to `path`
fn append_placed(
    path: &mut Vec<Command>,
    outline: &[Command],
    scale: f32,
    skew: f32,
    origin_x: f32,
    origin_y: f32,
) {
    let map = |p: zeno::Vector| -> zeno::Vector {
        let x = (p.x + p.y * skew) * scale + origin_x;
        let y = origin_y - p.y * scale;
        [x, y].into()
    };
    path.extend(outline.iter().map(|command| match *command {
        Command::MoveTo(p) => Command::MoveTo(map(p)),
        Command::LineTo(p) => Command::LineTo(map(p)),
        Command::QuadTo(c, p) => Command::QuadTo(map(c), map(p)),
        Command::CurveTo(c0, c1, p) => Command::CurveTo(map(c0), map(c1), map(p)),
        Command::Close => Command::Close,
    }));
}

/// Min x, min y, max x, max y over every point of `path`, control points included
fn path_bounds(path: &[Command]) -> Option<(f32, f32, f32, f32)> {
    let mut bounds: Option<(f32, f32, f32, f32)> = None;
    let mut add = |p: zeno::Vector| {
        let b = bounds.get_or_insert((p.x, p.y, p.x, p.y));
        *b = (b.0.min(p.x), b.1.min(p.y), b.2.max(p.x), b.3.max(p.y));
    };
    for command in path {
        match *command {
            Command::MoveTo(p) | Command::LineTo(p) => add(p),
            Command::QuadTo(c, p) => {
                add(c);
                add(p);
            },
            Command::CurveTo(c0, c1, p) => {
                add(c0);
                add(c1);
                add(p);
            },
            Command::Close => {},
        }
    }
    bounds
}

/// Outline pen that records skrifa outlines as zeno commands, font units, y-up
struct ZenoPen<'a> {
    commands: &'a mut Vec<Command>,
}

impl<'a> ZenoPen<'a> {
    fn new(commands: &'a mut Vec<Command>) -> Self {
        Self { commands }
    }
}

impl OutlinePen for ZenoPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::MoveTo([x, y].into()));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(Command::LineTo([x, y].into()));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.commands
            .push(Command::QuadTo([cx0, cy0].into(), [x, y].into()));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands.push(Command::CurveTo(
            [cx0, cy0].into(),
            [cx1, cy1].into(),
            [x, y].into(),
        ));
    }

    fn close(&mut self) {
        self.commands.push(Command::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_creation() {
        let rasterizer = ZenoRasterizer::default();
        assert_eq!(rasterizer.name(), "zeno");
        assert_eq!(rasterizer.cached_outlines(), 0);
    }

    #[test]
    fn test_placement_flips_and_scales() {
        let outline = vec![
            Command::MoveTo([0.0, 0.0].into()),
            Command::LineTo([0.0, 1000.0].into()),
            Command::Close,
        ];
        let mut path = Vec::new();
        append_placed(&mut path, &outline, 0.01, 0.0, 5.0, 20.0);
        assert_eq!(path[0], Command::MoveTo([5.0, 20.0].into()));
        assert_eq!(path[1], Command::LineTo([5.0, 10.0].into()));
        assert_eq!(path[2], Command::Close);
    }

    #[test]
    fn test_skew_leans_right_above_baseline() {
        let outline = vec![Command::MoveTo([0.0, 100.0].into())];
        let mut path = Vec::new();
        append_placed(&mut path, &outline, 1.0, OBLIQUE_SKEW, 0.0, 0.0);
        let Command::MoveTo(p) = path[0] else {
            panic!("expected move");
        };
        assert!(p.x > 20.0);
        assert_eq!(p.y, -100.0);
    }

    #[test]
    fn test_path_bounds_include_control_points() {
        let path = vec![
            Command::MoveTo([1.0, 2.0].into()),
            Command::QuadTo([5.0, -3.0].into(), [4.0, 8.0].into()),
            Command::Close,
        ];
        assert_eq!(path_bounds(&path), Some((1.0, -3.0, 5.0, 8.0)));
        assert_eq!(path_bounds(&[Command::Close]), None);
    }
}
