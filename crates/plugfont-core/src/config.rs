//! Host configuration
//!
//! Defaults are sensible for a desktop host. Every field can be overridden
//! from the environment with [`HostConfig::from_env`]:
//!
//! ```bash
//! PLUGFONT_DEFAULT_SIZE=14 PLUGFONT_SUBPIXEL=0 ./my_app
//! ```
//!
//! Unparseable values are logged and ignored rather than failing startup.

use std::path::PathBuf;

use crate::error::{FontError, Result};
use crate::types::FontFamily;

/// Pixel size used when a description asks for size 0
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Largest pixel size a font can be created or drawn at
pub const MAX_FONT_SIZE: u32 = 65535;

/// Default capacity of the shaping cache
pub const DEFAULT_SHAPING_CACHE_CAPACITY: usize = 256;

/// Everything a host can be tuned with
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub default_size: u32,
    /// Generic family that `FontFamily::Default` resolves to
    pub default_family: FontFamily,
    pub serif_family: Option<String>,
    pub sans_serif_family: Option<String>,
    pub monospace_family: Option<String>,
    pub load_system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
    /// Master switch; when off, coverage is binary
    pub antialias: bool,
    /// Allow LCD antialiasing on opaque targets
    pub subpixel: bool,
    /// Zero disables the cache
    pub shaping_cache_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_FONT_SIZE,
            default_family: FontFamily::SansSerif,
            serif_family: None,
            sans_serif_family: None,
            monospace_family: None,
            load_system_fonts: true,
            font_dirs: Vec::new(),
            antialias: true,
            subpixel: true,
            shaping_cache_capacity: DEFAULT_SHAPING_CACHE_CAPACITY,
        }
    }
}

impl HostConfig {
    /// Defaults with `PLUGFONT_*` overrides applied
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let valid_size = |v: &str| {
            v.parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_FONT_SIZE).contains(size))
        };
        if let Some(size) = parse_var(&lookup, "PLUGFONT_DEFAULT_SIZE", valid_size) {
            config.default_size = size;
        }
        if let Some(family) = parse_var(&lookup, "PLUGFONT_DEFAULT_FAMILY", FontFamily::parse) {
            config.default_family = family;
        }
        config.serif_family = lookup("PLUGFONT_SERIF").or(config.serif_family);
        config.sans_serif_family = lookup("PLUGFONT_SANS_SERIF").or(config.sans_serif_family);
        config.monospace_family = lookup("PLUGFONT_MONOSPACE").or(config.monospace_family);
        if let Some(flag) = parse_var(&lookup, "PLUGFONT_SYSTEM_FONTS", parse_flag) {
            config.load_system_fonts = flag;
        }
        if let Some(dirs) = lookup("PLUGFONT_FONT_DIRS") {
            config.font_dirs = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        if let Some(flag) = parse_var(&lookup, "PLUGFONT_ANTIALIAS", parse_flag) {
            config.antialias = flag;
        }
        if let Some(flag) = parse_var(&lookup, "PLUGFONT_SUBPIXEL", parse_flag) {
            config.subpixel = flag;
        }
        if let Some(capacity) =
            parse_var(&lookup, "PLUGFONT_SHAPING_CACHE", |v| v.parse::<usize>().ok())
        {
            config.shaping_cache_capacity = capacity;
        }

        config
    }

    pub fn with_default_size(mut self, size: u32) -> Self {
        self.default_size = size;
        self
    }

    pub fn with_default_family(mut self, family: FontFamily) -> Self {
        self.default_family = family;
        self
    }

    pub fn with_system_fonts(mut self, load: bool) -> Self {
        self.load_system_fonts = load;
        self
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn with_subpixel(mut self, subpixel: bool) -> Self {
        self.subpixel = subpixel;
        self
    }

    pub fn with_shaping_cache_capacity(mut self, capacity: usize) -> Self {
        self.shaping_cache_capacity = capacity;
        self
    }

    /// Reject configurations no host can run with
    pub fn validate(&self) -> Result<()> {
        if self.default_size == 0 {
            return Err(FontError::Config("default_size must be positive".into()));
        }
        if self.default_size > MAX_FONT_SIZE {
            return Err(FontError::Config(format!(
                "default_size must be at most {}",
                MAX_FONT_SIZE
            )));
        }
        if self.default_family == FontFamily::Default {
            return Err(FontError::Config(
                "default_family must name a concrete generic family".into(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
    } else {
        log::info!("{} set from environment", key);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_validate() {
        let config = HostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_size, DEFAULT_FONT_SIZE);
        assert!(config.antialias && config.subpixel);
    }

    #[test]
    fn env_overrides_apply() {
        let config = HostConfig::from_lookup(lookup_from(&[
            ("PLUGFONT_DEFAULT_SIZE", "22"),
            ("PLUGFONT_DEFAULT_FAMILY", "serif"),
            ("PLUGFONT_SUBPIXEL", "off"),
            ("PLUGFONT_SYSTEM_FONTS", "no"),
            ("PLUGFONT_SHAPING_CACHE", "0"),
            ("PLUGFONT_MONOSPACE", "Fira Mono"),
        ]));
        assert_eq!(config.default_size, 22);
        assert_eq!(config.default_family, FontFamily::Serif);
        assert!(!config.subpixel);
        assert!(!config.load_system_fonts);
        assert_eq!(config.shaping_cache_capacity, 0);
        assert_eq!(config.monospace_family.as_deref(), Some("Fira Mono"));
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let config = HostConfig::from_lookup(lookup_from(&[
            ("PLUGFONT_DEFAULT_SIZE", "huge"),
            ("PLUGFONT_ANTIALIAS", "maybe"),
            ("PLUGFONT_DEFAULT_SIZE_EXTRA", "1"),
        ]));
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn zero_size_from_env_keeps_default() {
        let config = HostConfig::from_lookup(lookup_from(&[("PLUGFONT_DEFAULT_SIZE", "0")]));
        assert_eq!(config.default_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn oversized_default_is_rejected() {
        let config = HostConfig::from_lookup(lookup_from(&[("PLUGFONT_DEFAULT_SIZE", "70000")]));
        assert_eq!(config.default_size, DEFAULT_FONT_SIZE);

        assert!(HostConfig::default().with_default_size(MAX_FONT_SIZE).validate().is_ok());
        let config = HostConfig::default().with_default_size(MAX_FONT_SIZE + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_default_family_loop() {
        let config = HostConfig::default().with_default_family(FontFamily::Default);
        assert!(config.validate().is_err());
        let config = HostConfig::default().with_default_size(0);
        assert!(config.validate().is_err());
    }
}
