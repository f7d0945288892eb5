//! In-memory fonts for builder tests

use kurbo::Point;
use norad::{Font, Glyph};

use super::BuildContext;
use crate::core::config::{Config, ReplacePolicy};
use crate::font_source::GlyphStore;
use crate::geometry::primitives::rectangle;

/// Glyph with a single box from the origin to `(width, height)`.
pub fn box_glyph(name: &str, width: f64, height: f64) -> Glyph {
    let mut glyph = Glyph::new(name);
    glyph.width = width;
    rectangle(&mut glyph, Point::new(0.0, height / 2.0), width, height / 2.0);
    glyph
}

/// Box glyph whose advance differs from its outline width.
pub fn spaced_glyph(name: &str, advance: f64, ink: f64, height: f64) -> Glyph {
    let mut glyph = box_glyph(name, ink, height);
    glyph.width = advance;
    glyph
}

pub fn font_with(glyphs: Vec<Glyph>) -> Font {
    let mut font = Font::new();
    for glyph in glyphs {
        font.default_layer_mut().insert_glyph(glyph);
    }
    font
}

/// Context at 1000 UPM with the built-in defaults, drawing disabled and
/// existing glyphs kept.
pub fn context(glyphs: Vec<Glyph>) -> BuildContext {
    let store = GlyphStore::new(font_with(glyphs));
    let config = Config::with_defaults(store.units_per_em()).unwrap();
    let mut ctx = BuildContext::new(store, config).unwrap();
    ctx.settings_mut().draw_missing = false;
    ctx.settings_mut().replace_policy = ReplacePolicy::Skip;
    ctx
}

pub fn drawing_context(glyphs: Vec<Glyph>) -> BuildContext {
    let mut ctx = context(glyphs);
    ctx.settings_mut().draw_missing = true;
    ctx
}

/// `(base, dx, dy, sx, sy)` of every component of a glyph.
pub fn placements(ctx: &BuildContext, name: &str) -> Vec<(String, f64, f64, f64, f64)> {
    ctx.store()
        .glyph(name)
        .map(|glyph| {
            glyph
                .components
                .iter()
                .map(|c| {
                    (
                        c.base.to_string(),
                        c.transform.x_offset,
                        c.transform.y_offset,
                        c.transform.x_scale,
                        c.transform.y_scale,
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
