//! Level sheet decoding
//!
//! Level sheets ship as ordinary PNGs. Whatever the source pixel format, the
//! decode goes through RGBA8 so brick generation always sees 4-byte pixels.

use std::path::Path;

use crate::sim::LevelSheet;

/// Decode a PNG level sheet from disk
pub fn load_level_sheet(path: &Path) -> Result<LevelSheet, String> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to open level sheet '{}': {e}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    log::debug!("Level sheet '{}': {}x{} px", path.display(), width, height);
    Ok(LevelSheet::from_flat_rgba(width, height, image.as_raw()))
}

/// Decode a PNG level sheet already in memory, e.g. the built-in sheet
pub fn load_level_sheet_from_bytes(bytes: &[u8]) -> Result<LevelSheet, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode level sheet: {e}"))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(LevelSheet::from_flat_rgba(width, height, image.as_raw()))
}
