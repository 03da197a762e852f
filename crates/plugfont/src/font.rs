// this_file: crates/plugfont/src/font.rs

//! What a font handle points at

use std::sync::Arc;

use plugfont_core::{
    traits::FontRef,
    types::{Direction, ShapingParams},
    FontDescription, FontMetrics, Var,
};
use plugfont_fontdb::{Face, MatchedFace, ScaledMetrics};

/// A matched face frozen at one size and style
#[derive(Debug)]
pub struct FontInstance {
    face: Arc<Face>,
    description: FontDescription,
    metrics: ScaledMetrics,
    synthetic_bold: bool,
    synthetic_oblique: bool,
}

impl FontInstance {
    /// Freeze a match; `request.size` must already be resolved to non-zero
    pub fn new(matched: MatchedFace, request: &FontDescription, metrics: ScaledMetrics) -> Self {
        let description = FontDescription {
            face: Var::String(matched.face.family().to_string()),
            ..request.clone()
        };
        Self {
            face: matched.face,
            description,
            metrics,
            synthetic_bold: matched.synthetic_bold,
            synthetic_oblique: matched.synthetic_oblique,
        }
    }

    pub fn face(&self) -> &Arc<Face> {
        &self.face
    }

    pub fn font_ref(&self) -> Arc<dyn FontRef> {
        self.face.clone()
    }

    /// The request as resolved, with `face` set to the matched family
    pub fn description(&self) -> &FontDescription {
        &self.description
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics.to_font_metrics()
    }

    pub fn scaled_metrics(&self) -> &ScaledMetrics {
        &self.metrics
    }

    /// Pixel size
    pub fn size(&self) -> f32 {
        self.description.size as f32
    }

    pub fn synthetic_bold(&self) -> bool {
        self.synthetic_bold
    }

    pub fn synthetic_oblique(&self) -> bool {
        self.synthetic_oblique
    }

    /// Shaping parameters for one run in `direction`
    pub fn shaping_params(&self, direction: Direction) -> ShapingParams {
        let mut features = Vec::new();
        if self.description.small_caps {
            features.push(("smcp".to_string(), 1));
        }
        ShapingParams {
            size: self.size(),
            direction,
            features,
            letter_spacing: self.description.letter_spacing as f32,
            word_spacing: self.description.word_spacing as f32,
        }
    }
}
