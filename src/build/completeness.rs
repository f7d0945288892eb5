//! Presence checks for parent glyphs

use std::collections::HashSet;

use tracing::warn;

use crate::font_source::GlyphStore;

/// Reports each missing parent once per run.
#[derive(Debug, Default)]
pub struct CompletenessChecker {
    reported: HashSet<String>,
}

impl CompletenessChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&mut self, store: &GlyphStore, name: &str) -> bool {
        if store.has_glyph(name) {
            return true;
        }
        if self.reported.insert(name.to_string()) {
            warn!("Parent glyph {name} is missing!");
        }
        false
    }

    #[cfg(test)]
    pub fn was_reported(&self, name: &str) -> bool {
        self.reported.contains(name)
    }

    #[cfg(test)]
    pub fn reported_count(&self) -> usize {
        self.reported.len()
    }
}
