// this_file: crates/plugfont/src/builder.rs

//! Assembling a host from configuration and backends

use std::sync::Arc;

use parking_lot::RwLock;

use plugfont_core::{
    error::Result,
    shaping_cache::{ShapingCache, ShapingCacheKey},
    traits::{FontRef, Rasterizer, Shaper},
    types::ShapedRun,
    HostConfig, ShapingParams,
};
use plugfont_fontdb::FontMatcher;
use plugfont_unicode::TextSegmenter;

use crate::host::FontHost;
use crate::resource::ResourceTracker;

/// Builder for [`FontHost`]
///
/// ```rust,no_run
/// use plugfont::{FontHost, HostConfig};
///
/// let host = FontHost::builder()
///     .config(HostConfig::default().with_system_fonts(false))
///     .font_file("fonts/NotoSans-Regular.ttf")
///     .build()?;
/// # Ok::<(), plugfont::FontError>(())
/// ```
pub struct FontHostBuilder {
    config: HostConfig,
    shaper: Option<Arc<dyn Shaper>>,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    font_data: Vec<Vec<u8>>,
    font_files: Vec<std::path::PathBuf>,
}

impl FontHostBuilder {
    /// Start from the environment's configuration
    pub fn new() -> Self {
        Self {
            config: HostConfig::from_env(),
            shaper: None,
            rasterizer: None,
            font_data: Vec::new(),
            font_files: Vec::new(),
        }
    }

    /// Replace the configuration wholesale
    pub fn config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose who turns characters into glyphs
    pub fn shaper(mut self, shaper: Arc<dyn Shaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    /// Choose who turns glyphs into pixels
    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Install a font from memory
    pub fn font_data(mut self, data: Vec<u8>) -> Self {
        self.font_data.push(data);
        self
    }

    /// Install a font file
    pub fn font_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }

    pub fn build(self) -> Result<FontHost> {
        self.config.validate()?;

        let mut matcher = FontMatcher::new(&self.config);
        for data in self.font_data {
            matcher.load_font_data(data)?;
        }
        for path in &self.font_files {
            matcher.load_font_file(path)?;
        }
        if matcher.is_empty() {
            log::warn!("No fonts installed; every create call will fail");
        }

        let shaper = self.shaper.unwrap_or_else(default_shaper);
        let shaping_cache = (self.config.shaping_cache_capacity > 0)
            .then(|| Arc::new(ShapingCache::new(self.config.shaping_cache_capacity)));
        let shaper = match &shaping_cache {
            Some(cache) => Arc::new(CachedShaper::new(shaper, cache.clone())) as Arc<dyn Shaper>,
            None => shaper,
        };

        let rasterizer = self.rasterizer.or_else(default_rasterizer);
        if rasterizer.is_none() {
            log::warn!("No rasterizer configured; drawing will fail");
        }

        log::debug!(
            "Font host ready: {} faces, shaper {}, rasterizer {}",
            matcher.face_count(),
            shaper.name(),
            rasterizer.as_ref().map_or("none", |r| r.name())
        );

        Ok(FontHost {
            config: self.config,
            matcher: RwLock::new(matcher),
            shaper,
            rasterizer,
            shaping_cache,
            segmenter: TextSegmenter::new(),
            resources: ResourceTracker::new(),
        })
    }
}

impl Default for FontHostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "shaping-hr")]
fn default_shaper() -> Arc<dyn Shaper> {
    Arc::new(plugfont_shape_hr::HarfrustShaper::new())
}

#[cfg(not(feature = "shaping-hr"))]
fn default_shaper() -> Arc<dyn Shaper> {
    Arc::new(plugfont_shape_none::NoneShaper::new())
}

#[cfg(feature = "render-zeno")]
fn default_rasterizer() -> Option<Arc<dyn Rasterizer>> {
    Some(Arc::new(plugfont_render_zeno::ZenoRasterizer::new()))
}

#[cfg(not(feature = "render-zeno"))]
fn default_rasterizer() -> Option<Arc<dyn Rasterizer>> {
    None
}

/// Wrapper adding the shared shaping cache in front of any shaper
struct CachedShaper {
    inner: Arc<dyn Shaper>,
    cache: Arc<ShapingCache>,
}

impl CachedShaper {
    fn new(inner: Arc<dyn Shaper>, cache: Arc<ShapingCache>) -> Self {
        Self { inner, cache }
    }
}

impl Shaper for CachedShaper {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapedRun> {
        let key = ShapingCacheKey::new(text, font.cache_id(), params);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let shaped = self.inner.shape(text, font, params)?;
        self.cache.insert(key, shaped.clone());
        Ok(shaped)
    }

    fn clear_cache(&self) {
        self.cache.clear();
        self.inner.clear_cache();
    }
}
