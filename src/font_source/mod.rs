//! Font source data structures
//!
//! This module contains everything related to the font being built: the
//! glyph store the builders read from and write to, and its metrics.

pub mod metrics;
pub mod store;


// Explicit re-exports for public API
pub use metrics::FontMetrics;
pub use store::{GlyphStore, NEVER_DECOMPOSE};
