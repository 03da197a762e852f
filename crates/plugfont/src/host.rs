// this_file: crates/plugfont/src/host.rs

//! The host side of the font interface
//!
//! [`FontHost`] owns every piece of real logic: the font database, shaping,
//! rasterization and the handle table. Each interface operation has a
//! `try_` twin returning a proper [`Result`]; the [`FontInterface`] impl is
//! a thin layer that logs the error and returns the operation's sentinel.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use plugfont_core::{
    config::MAX_FONT_SIZE,
    error::{FontError, Result},
    shaping_cache::{CacheStats, ShapingCache},
    traits::{Rasterizer, Shaper},
    types::{AntialiasMode, Color, DrawParams},
    FontDescription, FontInterface, FontMetrics, HostConfig, ImageData, ImageDataDesc,
    ImageDataFormat, Module, Point, Rect, Resource, Size, TextRun, FONT_INTERFACE_NAME,
    INVALID_CHARACTER_OFFSET, INVALID_WIDTH,
};
use plugfont_fontdb::{FontMatcher, ScaledMetrics};
use plugfont_unicode::TextSegmenter;

use crate::builder::FontHostBuilder;
use crate::font::FontInstance;
use crate::layout::TextLayout;
use crate::resource::{ResourceKind, ResourceTracker};

/// Runtime behind the font interface
pub struct FontHost {
    pub(crate) config: HostConfig,
    pub(crate) matcher: RwLock<FontMatcher>,
    pub(crate) shaper: Arc<dyn Shaper>,
    pub(crate) rasterizer: Option<Arc<dyn Rasterizer>>,
    pub(crate) shaping_cache: Option<Arc<ShapingCache>>,
    pub(crate) segmenter: TextSegmenter,
    pub(crate) resources: ResourceTracker,
}

impl FontHost {
    pub fn builder() -> FontHostBuilder {
        FontHostBuilder::new()
    }

    /// Host configured from the environment with the default backends
    pub fn new() -> Result<Self> {
        FontHostBuilder::new().build()
    }

    pub fn with_config(config: HostConfig) -> Result<Self> {
        FontHostBuilder::new().config(config).build()
    }

    /// Look up an interface table by name
    ///
    /// Only the exact published name (including its version suffix) matches.
    pub fn interface(&self, name: &str) -> Option<&dyn FontInterface> {
        if name == FONT_INTERFACE_NAME {
            Some(self)
        } else {
            log::debug!("Unknown interface {:?}", name);
            None
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Install more fonts from memory; returns the number of faces added
    pub fn load_font_data(&self, data: Vec<u8>) -> Result<usize> {
        self.matcher.write().load_font_data(data)
    }

    pub fn load_font_file(&self, path: impl AsRef<std::path::Path>) -> Result<usize> {
        self.matcher.write().load_font_file(path)
    }

    /// Family names of all installed faces
    pub fn family_names(&self) -> Vec<String> {
        self.matcher.read().family_names()
    }

    pub fn shaping_cache_stats(&self) -> Option<CacheStats> {
        self.shaping_cache.as_ref().map(|cache| cache.stats())
    }

    /// Drop cached shaping results and glyph outlines
    pub fn clear_caches(&self) {
        self.shaper.clear_cache();
        if let Some(rasterizer) = &self.rasterizer {
            rasterizer.clear_cache();
        }
    }

    // Resource lifecycle

    pub fn add_ref_resource(&self, resource: Resource) -> bool {
        self.resources.add_ref(resource)
    }

    pub fn release_resource(&self, resource: Resource) -> bool {
        self.resources.release(resource)
    }

    /// Free every resource `module` created; returns how many were freed
    pub fn release_module(&self, module: Module) -> usize {
        self.resources.release_module(module)
    }

    /// Number of live resources
    pub fn live_resources(&self) -> usize {
        self.resources.len()
    }

    /// Allocate an image resource, or the null handle for unusable sizes
    ///
    /// Images always start out transparent black, so `init_to_zero` only
    /// documents the caller's expectation.
    pub fn create_image_data(
        &self,
        module: Module,
        format: ImageDataFormat,
        size: Size,
        init_to_zero: bool,
    ) -> Resource {
        match ImageData::new(format, size) {
            Ok(image) => {
                log::trace!(
                    "Image {}x{} ({:?}, zeroed: {})",
                    size.width,
                    size.height,
                    format,
                    init_to_zero
                );
                self.resources
                    .insert(module, ResourceKind::ImageData(Arc::new(Mutex::new(image))))
            },
            Err(err) => {
                log::debug!("create_image_data failed: {}", err);
                Resource::NULL
            },
        }
    }

    pub fn is_image_data(&self, resource: Resource) -> bool {
        matches!(self.resources.get(resource), Some(ResourceKind::ImageData(_)))
    }

    pub fn describe_image_data(&self, resource: Resource) -> Option<ImageDataDesc> {
        let image = self.resources.image_data(resource).ok()?;
        let desc = image.lock().describe();
        Some(desc)
    }

    /// Run `f` with the pixels of an image resource locked
    pub fn with_image_data<R>(
        &self,
        resource: Resource,
        f: impl FnOnce(&mut ImageData) -> R,
    ) -> Result<R> {
        let image = self.resources.image_data(resource)?;
        let mut guard = image.lock();
        Ok(f(&mut guard))
    }

    // Fallible operations

    /// Resolve `description` and register the resulting font for `module`
    pub fn try_create(&self, module: Module, description: &FontDescription) -> Result<Resource> {
        let mut request = description.clone();
        if request.size == 0 {
            request.size = self.config.default_size;
        }
        if request.size > MAX_FONT_SIZE {
            return Err(FontError::InvalidSize(request.size));
        }

        let matched = self.matcher.read().resolve(&request)?;
        let metrics = ScaledMetrics::compute(&matched.face, request.size as f32)?;
        let font = FontInstance::new(matched, &request, metrics);

        let resource = self.resources.insert(module, ResourceKind::Font(Arc::new(font)));
        if resource.is_null() {
            return Err(FontError::InvalidResource(resource));
        }
        Ok(resource)
    }

    /// The resolved description and metrics of a font
    pub fn try_describe(&self, font: Resource) -> Result<(FontDescription, FontMetrics)> {
        let font = self.resources.font(font)?;
        Ok((font.description().clone(), font.metrics()))
    }

    /// Shape a text run with a font
    pub fn layout(&self, font: Resource, text: &TextRun) -> Result<TextLayout> {
        let font = self.resources.font(font)?;
        self.layout_with(&font, text)
    }

    fn layout_with(&self, font: &FontInstance, text: &TextRun) -> Result<TextLayout> {
        let content = text
            .text()
            .ok_or(FontError::InvalidText(text.text.type_name()))?;
        TextLayout::new(
            content,
            text.rtl,
            text.override_direction,
            font,
            self.shaper.as_ref(),
            &self.segmenter,
        )
    }

    pub fn try_measure_text(&self, font: Resource, text: &TextRun) -> Result<i32> {
        // Negative spacing can pull the pen back past the origin
        Ok((self.layout(font, text)?.width().round() as i32).max(0))
    }

    pub fn try_character_offset_for_pixel(
        &self,
        font: Resource,
        text: &TextRun,
        pixel_position: i32,
    ) -> Result<u32> {
        let layout = self.layout(font, text)?;
        Ok(layout.character_offset_for_pixel(pixel_position as f32) as u32)
    }

    pub fn try_pixel_offset_for_character(
        &self,
        font: Resource,
        text: &TextRun,
        char_offset: u32,
    ) -> Result<i32> {
        let layout = self.layout(font, text)?;
        Ok(layout
            .pixel_offset_for_character(char_offset as usize)?
            .round() as i32)
    }

    /// Draw a text run into an image resource
    #[allow(clippy::too_many_arguments)]
    pub fn try_draw_text_at(
        &self,
        font: Resource,
        image_data: Resource,
        text: &TextRun,
        position: &Point,
        color: u32,
        clip: Option<&Rect>,
        image_data_is_opaque: bool,
    ) -> Result<()> {
        let font = self.resources.font(font)?;
        let image = self.resources.image_data(image_data)?;
        let rasterizer = self.rasterizer.as_ref().ok_or_else(|| {
            plugfont_core::error::RenderError::BackendError("no rasterizer configured".into())
        })?;

        let layout = self.layout_with(&font, text)?;
        let glyphs = layout.placements(position);
        if glyphs.is_empty() {
            return Ok(());
        }

        let mut target = image.lock();
        let bounds = target.bounds();
        let clip = match clip {
            Some(clip) => clip.intersect(&bounds),
            None => Some(bounds),
        };
        let Some(clip) = clip else {
            log::trace!("Clip misses image {}, nothing to draw", image_data);
            return Ok(());
        };

        let params = DrawParams {
            size: font.size(),
            color: Color::from_argb(color),
            antialias: self.antialias_mode(image_data_is_opaque),
            clip,
            synthetic_bold: font.synthetic_bold(),
            synthetic_oblique: font.synthetic_oblique(),
        };
        rasterizer.draw(&glyphs, font.font_ref(), &params, &mut target)
    }

    /// Subpixel coverage is only safe on opaque targets
    fn antialias_mode(&self, opaque: bool) -> AntialiasMode {
        if !self.config.antialias {
            AntialiasMode::None
        } else if opaque && self.config.subpixel {
            AntialiasMode::Subpixel
        } else {
            AntialiasMode::Grayscale
        }
    }
}

impl FontInterface for FontHost {
    fn create(&self, module: Module, description: &FontDescription) -> Resource {
        self.try_create(module, description).unwrap_or_else(|err| {
            log::warn!("create failed: {}", err);
            Resource::NULL
        })
    }

    fn is_font(&self, resource: Resource) -> bool {
        matches!(self.resources.get(resource), Some(ResourceKind::Font(_)))
    }

    fn describe(
        &self,
        font: Resource,
        description: &mut FontDescription,
        metrics: &mut FontMetrics,
    ) -> bool {
        if !description.face.is_empty_slot() {
            log::debug!(
                "describe failed: {}",
                FontError::SlotNotEmpty(description.face.type_name())
            );
            return false;
        }
        match self.try_describe(font) {
            Ok((resolved, resolved_metrics)) => {
                *description = resolved;
                *metrics = resolved_metrics;
                true
            },
            Err(err) => {
                log::debug!("describe failed: {}", err);
                false
            },
        }
    }

    fn draw_text_at(
        &self,
        font: Resource,
        image_data: Resource,
        text: &TextRun,
        position: &Point,
        color: u32,
        clip: Option<&Rect>,
        image_data_is_opaque: bool,
    ) -> bool {
        match self.try_draw_text_at(
            font,
            image_data,
            text,
            position,
            color,
            clip,
            image_data_is_opaque,
        ) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("draw_text_at failed: {}", err);
                false
            },
        }
    }

    fn measure_text(&self, font: Resource, text: &TextRun) -> i32 {
        self.try_measure_text(font, text).unwrap_or_else(|err| {
            log::debug!("measure_text failed: {}", err);
            INVALID_WIDTH
        })
    }

    fn character_offset_for_pixel(
        &self,
        font: Resource,
        text: &TextRun,
        pixel_position: i32,
    ) -> u32 {
        self.try_character_offset_for_pixel(font, text, pixel_position)
            .unwrap_or_else(|err| {
                log::debug!("character_offset_for_pixel failed: {}", err);
                INVALID_CHARACTER_OFFSET
            })
    }

    fn pixel_offset_for_character(&self, font: Resource, text: &TextRun, char_offset: u32) -> i32 {
        self.try_pixel_offset_for_character(font, text, char_offset)
            .unwrap_or_else(|err| {
                log::debug!("pixel_offset_for_character failed: {}", err);
                INVALID_WIDTH
            })
    }
}
