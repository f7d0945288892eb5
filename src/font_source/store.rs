//! Glyph store over the default layer of a UFO font
//!
//! Builders read parents and write composites through this type. Reads are
//! side-effect free; the only in-place rewrite of an existing glyph is
//! [`GlyphStore::decompose`], which logs what it flattens.

use kurbo::{Affine, Rect, Shape};
use norad::{Contour, Font, Glyph};
use tracing::{debug, info};

use super::metrics::FontMetrics;
use crate::core::errors::StoreError;
use crate::data::conversions::{affine_from_norad, contour_to_bezpath};
use crate::geometry::contour::transform_contour;

/// Glyphs whose component structure is inspected by builders
pub const NEVER_DECOMPOSE: &[&str] = &["uniE08B"];

/// Guard against component cycles
const MAX_COMPONENT_DEPTH: usize = 32;

pub struct GlyphStore {
    font: Font,
    metrics: FontMetrics,
}

impl GlyphStore {
    pub fn new(font: Font) -> Self {
        let metrics = FontMetrics::from_ufo(&font);
        Self { font, metrics }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn into_font(self) -> Font {
        self.font
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn units_per_em(&self) -> f64 {
        self.metrics.units_per_em
    }

    pub fn staff_space(&self) -> f64 {
        self.metrics.staff_space()
    }

    pub fn has_glyph(&self, name: &str) -> bool {
        self.glyph(name).is_some()
    }

    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.font.default_layer().get_glyph(name)
    }

    pub fn glyph_count(&self) -> usize {
        self.font.default_layer().len()
    }

    pub fn glyph_names(&self) -> Vec<String> {
        self.font
            .default_layer()
            .iter()
            .map(|glyph| glyph.name().to_string())
            .collect()
    }

    /// Insert a glyph, replacing any glyph of the same name.
    pub fn insert(&mut self, glyph: Glyph) {
        self.font.default_layer_mut().insert_glyph(glyph);
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        self.font
            .default_layer_mut()
            .rename_glyph(old, new, false)
            .map_err(|e| StoreError::Rename {
                from: old.to_string(),
                to: new.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn clear_codepoints(&mut self, name: &str) -> Result<(), StoreError> {
        let glyph = self
            .font
            .default_layer_mut()
            .get_glyph_mut(name)
            .ok_or_else(|| StoreError::MissingGlyph(name.to_string()))?;
        glyph.codepoints = Default::default();
        Ok(())
    }

    pub fn advance_width(&self, name: &str) -> Option<f64> {
        self.glyph(name).map(|glyph| glyph.width)
    }

    /// Kerning between two glyphs, 0 when the pair is not kerned.
    pub fn kerning(&self, left: &str, right: &str) -> f64 {
        self.font
            .kerning
            .iter()
            .find(|(first, _)| first.as_str() == left)
            .and_then(|(_, pairs)| {
                pairs
                    .iter()
                    .find(|(second, _)| second.as_str() == right)
                    .map(|(_, value)| *value)
            })
            .unwrap_or(0.0)
    }

    /// Bounding box of a glyph including everything its components draw.
    pub fn bounding_box(&self, name: &str) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        self.collect_bounds(name, Affine::IDENTITY, 0, &mut bounds);
        bounds
    }

    fn collect_bounds(
        &self,
        name: &str,
        transform: Affine,
        depth: usize,
        bounds: &mut Option<Rect>,
    ) {
        if depth > MAX_COMPONENT_DEPTH {
            return;
        }
        let Some(glyph) = self.glyph(name) else {
            return;
        };
        for contour in &glyph.contours {
            let mut path = contour_to_bezpath(contour);
            path.apply_affine(transform);
            let rect = path.bounding_box();
            let merged = match *bounds {
                Some(existing) => existing.union(rect),
                None => rect,
            };
            *bounds = Some(merged);
        }
        for component in &glyph.components {
            let nested = transform * affine_from_norad(&component.transform);
            self.collect_bounds(component.base.as_str(), nested, depth + 1, bounds);
        }
    }

    /// Contours of a glyph with every component folded in.
    ///
    /// Returns `None` when the glyph does not exist. References to missing
    /// glyphs contribute nothing.
    pub fn flattened(&self, name: &str) -> Option<Vec<Contour>> {
        self.glyph(name)?;
        Some(self.flattened_at_depth(name, 0))
    }

    fn flattened_at_depth(&self, name: &str, depth: usize) -> Vec<Contour> {
        if depth > MAX_COMPONENT_DEPTH {
            return Vec::new();
        }
        let Some(glyph) = self.glyph(name) else {
            return Vec::new();
        };
        let mut contours = glyph.contours.clone();
        for component in &glyph.components {
            let nested = self.flattened_at_depth(component.base.as_str(), depth + 1);
            contours.extend(
                nested
                    .iter()
                    .map(|contour| transform_contour(contour, &component.transform)),
            );
        }
        contours
    }

    /// Replace a glyph's components with their outlines.
    ///
    /// Returns whether the glyph was changed. Glyphs in [`NEVER_DECOMPOSE`]
    /// and glyphs without components are left alone.
    pub fn decompose(&mut self, name: &str) -> bool {
        if NEVER_DECOMPOSE.contains(&name) {
            debug!("Keeping components of {name}");
            return false;
        }
        let has_components = self
            .glyph(name)
            .map(|glyph| !glyph.components.is_empty())
            .unwrap_or(false);
        if !has_components {
            return false;
        }
        let Some(contours) = self.flattened(name) else {
            return false;
        };
        if let Some(glyph) = self.font.default_layer_mut().get_glyph_mut(name) {
            glyph.contours = contours;
            glyph.components.clear();
            info!("Decomposing: {name}");
            return true;
        }
        false
    }
}
