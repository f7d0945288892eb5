//! Writing finished glyphs into the store
//!
//! Every glyph the builders produce, drawn parent or composite, passes
//! through [`commit`], which applies the replace policy and stamps the
//! codepoint, mark colour and advance width.

use norad::Glyph;
use tracing::info;

use crate::core::config::{GlobalSettings, ReplacePolicy};
use crate::core::errors::StoreError;
use crate::font_source::GlyphStore;

const MARK_COLOR_KEY: &str = "public.markColor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Appended,
    SkippedExisting,
}

/// Codepoint encoded in a `uniXXXX` name.
///
/// Suffixed alternates and ligature names have none.
pub fn codepoint_from_name(name: &str) -> Option<char> {
    let hex = name.strip_prefix("uni")?;
    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// `public.markColor` value for a mark hue, `None` for hue 0.
pub fn mark_colour_rgba(hue: i64) -> Option<String> {
    if hue <= 0 {
        return None;
    }
    let degrees = (hue % 256) as f64 * 360.0 / 256.0;
    let sector = degrees / 60.0;
    let f = sector.fract();
    let (r, g, b) = match sector.floor() as i64 {
        0 => (1.0, f, 0.0),
        1 => (1.0 - f, 1.0, 0.0),
        2 => (0.0, 1.0, f),
        3 => (0.0, 1.0 - f, 1.0),
        4 => (f, 0.0, 1.0),
        _ => (1.0, 0.0, 1.0 - f),
    };
    let round = |v: f64| (v * 1000.0).round() / 1000.0;
    Some(format!("{},{},{},1", round(r), round(g), round(b)))
}

fn apply_mark(glyph: &mut Glyph, hue: i64) {
    match mark_colour_rgba(hue) {
        Some(colour) => {
            glyph.lib.insert(MARK_COLOR_KEY.to_string(), colour.into());
        }
        None => {
            glyph.lib.remove(MARK_COLOR_KEY);
        }
    }
}

/// Insert `glyph` under its own name with the given advance width.
pub fn commit(
    store: &mut GlyphStore,
    settings: &GlobalSettings,
    mut glyph: Glyph,
    width: f64,
) -> Result<CommitOutcome, StoreError> {
    let name = glyph.name().to_string();

    if store.has_glyph(&name) {
        match settings.replace_policy {
            ReplacePolicy::Skip => {
                info!("Skipping preexisting: {name}");
                return Ok(CommitOutcome::SkippedExisting);
            }
            ReplacePolicy::Rename => {
                let archived = format!("{}_{}", name, settings.timestamp.now());
                store.rename(&name, &archived)?;
                store.clear_codepoints(&archived)?;
            }
            ReplacePolicy::Overwrite => {}
        }
    }

    glyph.codepoints = Default::default();
    if let Some(codepoint) = codepoint_from_name(&name) {
        glyph.codepoints.insert(codepoint);
    }
    glyph.width = width;
    apply_mark(&mut glyph, settings.mark_colour);
    store.insert(glyph);
    info!("Appending: {name}");
    Ok(CommitOutcome::Appended)
}
