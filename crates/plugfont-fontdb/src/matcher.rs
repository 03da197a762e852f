// this_file: crates/plugfont-fontdb/src/matcher.rs

//! Turning a description into a concrete face
//!
//! The lookup order is: the named face, the requested generic family, the
//! configured default family, and finally the closest installed face by
//! style and weight. As long as one face is installed, something resolves.

use std::collections::HashMap;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Style, Weight, ID};
use parking_lot::RwLock;
use read_fonts::FileRef;

use plugfont_core::{
    error::{FontError, FontLoadError, Result},
    FontDescription, FontFamily, HostConfig,
};

use crate::face::Face;

/// What matching picked, and what it could not honour
#[derive(Debug, Clone)]
pub struct MatchedFace {
    pub face: Arc<Face>,
    /// Bold was requested but the face is lighter
    pub synthetic_bold: bool,
    /// Italic was requested but the face is upright
    pub synthetic_oblique: bool,
}

/// Font database plus a cache of loaded faces
pub struct FontMatcher {
    db: Database,
    default_family: FontFamily,
    faces: RwLock<HashMap<ID, Arc<Face>>>,
}

impl FontMatcher {
    /// Database populated according to `config`
    pub fn new(config: &HostConfig) -> Self {
        let mut db = Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            db.load_fonts_dir(dir);
        }
        if let Some(name) = &config.serif_family {
            db.set_serif_family(name.clone());
        }
        if let Some(name) = &config.sans_serif_family {
            db.set_sans_serif_family(name.clone());
        }
        if let Some(name) = &config.monospace_family {
            db.set_monospace_family(name.clone());
        }
        log::debug!("Font database holds {} faces", db.len());

        Self {
            db,
            default_family: config.default_family,
            faces: RwLock::new(HashMap::new()),
        }
    }

    /// Empty database; useful for tests and embedders with their own fonts
    pub fn empty() -> Self {
        Self {
            db: Database::new(),
            default_family: FontFamily::SansSerif,
            faces: RwLock::new(HashMap::new()),
        }
    }

    /// Add fonts from memory, returning how many faces were added
    pub fn load_font_data(&mut self, data: Vec<u8>) -> Result<usize> {
        FileRef::new(&data).map_err(|_| FontLoadError::InvalidData)?;
        let before = self.db.len();
        self.db.load_font_data(data);
        Ok(self.db.len() - before)
    }

    /// Add a font file, returning how many faces were added
    pub fn load_font_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<usize> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|_| FontLoadError::FileNotFound(path.display().to_string()))?;
        self.load_font_data(data)
    }

    /// Name the face used for a generic family
    pub fn set_generic_family(&mut self, family: FontFamily, name: impl Into<String>) {
        let name = name.into();
        match family {
            FontFamily::Serif => self.db.set_serif_family(name),
            FontFamily::SansSerif => self.db.set_sans_serif_family(name),
            FontFamily::Monospace => self.db.set_monospace_family(name),
            FontFamily::Default => {
                log::warn!("Cannot name a face for the default family; set a generic one");
            },
        }
    }

    pub fn set_default_family(&mut self, family: FontFamily) {
        if family != FontFamily::Default {
            self.default_family = family;
        }
    }

    pub fn default_family(&self) -> FontFamily {
        self.default_family
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Family names of every installed face, deduplicated and sorted
    pub fn family_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Generic family that `Default` stands for in this database
    pub fn concrete_family(&self, family: FontFamily) -> FontFamily {
        match family {
            FontFamily::Default => self.default_family,
            other => other,
        }
    }

    /// Best face for `desc`
    pub fn resolve(&self, desc: &FontDescription) -> Result<MatchedFace> {
        let weight = Weight(desc.weight.to_css());
        let style = if desc.italic {
            Style::Italic
        } else {
            Style::Normal
        };

        let id = self
            .query_face_name(desc, weight, style)
            .or_else(|| self.query_generic(self.concrete_family(desc.family), weight, style))
            .or_else(|| self.query_generic(self.default_family, weight, style))
            .or_else(|| self.closest_face(weight, style))
            .ok_or_else(|| FontError::NoMatchingFont(describe_request(desc)))?;

        let face = self.load_face(id)?;
        let synthetic_bold = desc.weight.is_bold() && face.weight() < 600;
        let synthetic_oblique = desc.italic && !face.is_italic();

        log::debug!(
            "Matched {} to {:?} (synthetic bold: {}, synthetic oblique: {})",
            describe_request(desc),
            face,
            synthetic_bold,
            synthetic_oblique
        );

        Ok(MatchedFace {
            face,
            synthetic_bold,
            synthetic_oblique,
        })
    }

    fn query_face_name(&self, desc: &FontDescription, weight: Weight, style: Style) -> Option<ID> {
        let name = desc.face_name()?;
        let id = self.query(&[Family::Name(name)], weight, style);
        if id.is_none() {
            log::debug!("No face named {:?}; falling back to generic family", name);
        }
        id
    }

    fn query_generic(&self, family: FontFamily, weight: Weight, style: Style) -> Option<ID> {
        let family = match family {
            FontFamily::Serif => Family::Serif,
            FontFamily::SansSerif | FontFamily::Default => Family::SansSerif,
            FontFamily::Monospace => Family::Monospace,
        };
        self.query(&[family], weight, style)
    }

    fn query(&self, families: &[Family<'_>], weight: Weight, style: Style) -> Option<ID> {
        let query = Query {
            families,
            weight,
            stretch: fontdb::Stretch::Normal,
            style,
        };
        self.db.query(&query)
    }

    /// Last resort: any face, preferring matching style, then nearest weight
    fn closest_face(&self, weight: Weight, style: Style) -> Option<ID> {
        self.db
            .faces()
            .min_by_key(|face| {
                let style_penalty = if face.style == style { 0 } else { 1000 };
                style_penalty + (face.weight.0 as i32 - weight.0 as i32).abs()
            })
            .map(|face| face.id)
    }

    /// Load (or fetch from cache) the face behind a database ID
    fn load_face(&self, id: ID) -> Result<Arc<Face>> {
        if let Some(face) = self.faces.read().get(&id) {
            return Ok(Arc::clone(face));
        }

        let info = self
            .db
            .face(id)
            .ok_or_else(|| FontLoadError::FaceDataUnavailable(format!("{:?}", id)))?;
        let family = info
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| info.post_script_name.clone());
        let italic = info.style != Style::Normal;
        let (weight, monospaced) = (info.weight.0, info.monospaced);

        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (Arc::new(data.to_vec()), index))
            .ok_or_else(|| FontLoadError::FaceDataUnavailable(family.clone()))?;

        let face = Arc::new(
            Face::from_data(data, index)?
                .with_family(family)
                .with_style(weight, italic, monospaced),
        );
        self.faces.write().insert(id, Arc::clone(&face));
        Ok(face)
    }
}

fn describe_request(desc: &FontDescription) -> String {
    format!(
        "{} / {} {}{}",
        desc.face_name().unwrap_or(desc.family.as_str()),
        desc.weight.to_css(),
        if desc.italic { "italic " } else { "" },
        desc.size
    )
}
