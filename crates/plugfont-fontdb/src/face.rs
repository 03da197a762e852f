// this_file: crates/plugfont-fontdb/src/face.rs

//! A single face, loaded and ready to shape text
//!
//! Faces store their raw bytes behind an `Arc` and create parser views
//! on demand, so collections (TTC) share one buffer between faces.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use read_fonts::{FontRef as ReadFontRef, TableProvider};

use plugfont_core::{
    error::{FontLoadError, Result},
    traits::FontRef,
    GlyphId,
};

/// A face brought into memory together with what matching learned about it
pub struct Face {
    data: Arc<Vec<u8>>,
    face_index: u32,
    units_per_em: u16,
    family: String,
    weight: u16,
    italic: bool,
    monospaced: bool,
    cache_id: u64,
}

impl Face {
    /// Parse face `face_index` of `data`; style attributes come from OS/2
    pub fn from_data(data: Arc<Vec<u8>>, face_index: u32) -> Result<Self> {
        let font_ref =
            ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);

        let (weight, italic) = font_ref
            .os2()
            .map(|os2| {
                // fsSelection bit 0 is ITALIC, bit 9 is OBLIQUE
                let selection = os2.fs_selection().bits();
                (os2.us_weight_class(), selection & 0x0201 != 0)
            })
            .unwrap_or((400, false));

        let monospaced = font_ref
            .post()
            .map(|post| post.is_fixed_pitch() != 0)
            .unwrap_or(false);

        let cache_id = {
            let mut hasher = DefaultHasher::new();
            data.hash(&mut hasher);
            face_index.hash(&mut hasher);
            hasher.finish()
        };

        Ok(Self {
            data,
            face_index,
            units_per_em,
            family: String::new(),
            weight,
            italic,
            monospaced,
            cache_id,
        })
    }

    /// Attach the family name reported by the font database
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Override style attributes with the database's view of the face
    pub fn with_style(mut self, weight: u16, italic: bool, monospaced: bool) -> Self {
        self.weight = weight;
        self.italic = italic;
        self.monospaced = monospaced;
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// CSS numeric weight of the face
    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn is_monospaced(&self) -> bool {
        self.monospaced
    }

    /// Parser view used for metrics and outlines
    pub fn skrifa_ref(&self) -> Option<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.face_index).ok()
    }

    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }

    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    /// Advance of a glyph in font units; 0 when the glyph has no metrics
    pub fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.font_ref()
            .and_then(|font| {
                let hmtx = font.hmtx().ok()?;
                let advance = hmtx.advance(read_fonts::types::GlyphId::new(glyph_id))?;
                Some(advance as f32)
            })
            .unwrap_or(0.0)
    }

    pub fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| maxp.num_glyphs() as u32))
    }
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("family", &self.family)
            .field("face_index", &self.face_index)
            .field("weight", &self.weight)
            .field("italic", &self.italic)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontRef for Face {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.glyph_id(ch)
    }

    fn advance_width(&self, glyph_id: GlyphId) -> f32 {
        self.advance_width(glyph_id)
    }

    fn glyph_count(&self) -> Option<u32> {
        self.glyph_count()
    }

    fn cache_id(&self) -> u64 {
        self.cache_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_from_garbage_fails() {
        let result = Face::from_data(Arc::new(vec![0; 100]), 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_face_from_noto_sans() {
        let face = Face::from_data(Arc::new(ttf_noto_sans::REGULAR.to_vec()), 0)
            .unwrap()
            .with_family("Noto Sans");
        assert_eq!(face.family(), "Noto Sans");
        assert_eq!(face.weight(), 400);
        assert!(!face.is_italic());
        assert!(!face.is_monospaced());
        assert!(face.units_per_em() > 0);
        assert!(face.glyph_id('A').is_some());
        assert!(face.advance_width(face.glyph_id('A').unwrap()) > 0.0);
        assert!(face.glyph_count().unwrap() > 100);
    }

    #[test]
    fn test_cache_id_is_stable_per_data() {
        let data = Arc::new(ttf_noto_sans::REGULAR.to_vec());
        let a = Face::from_data(data.clone(), 0).unwrap();
        let b = Face::from_data(data, 0).unwrap();
        assert_eq!(a.cache_id(), b.cache_id());
    }
}
