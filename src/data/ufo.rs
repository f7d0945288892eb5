//! UFO file I/O operations

use std::path::Path;

use norad::Font;
use tracing::debug;

use crate::core::errors::StoreError;

/// Load a UFO font from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font, StoreError> {
    let path = path.as_ref();
    let font = Font::load(path).map_err(|e| StoreError::Load(format!("{}: {e}", path.display())))?;
    debug!("Loaded UFO from {:?}", path);
    Ok(font)
}

/// Write a UFO font to disk, replacing any existing package at `path`
pub fn save_ufo_to_path(font: &Font, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    font.save(path)
        .map_err(|e| StoreError::Save(format!("{}: {e}", path.display())))?;
    debug!("Saved UFO to {:?}", path);
    Ok(())
}
