//! Level sheets and level progression
//!
//! Levels are stored stacked vertically in one RGBA image: each
//! `level_height` rows of pixels describe one level, one pixel per brick
//! cell. An opaque (or even faintly translucent) pixel becomes a brick of
//! that pixel's color; only a fully transparent pixel leaves a gap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Brick;
use crate::consts::*;

/// Level operations that can fail
///
/// Both variants are caller-sequencing bugs rather than runtime conditions;
/// the resolver validates with [`LevelManager::has_next_level`] before
/// changing levels, so neither should be seen outside tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    /// Requested level number outside `1..=number_of_levels`
    OutOfRange { requested: u32, available: u32 },
    /// A level sheet must be loaded before bricks can be generated
    NotLoaded,
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::OutOfRange {
                requested,
                available,
            } => {
                write!(
                    f,
                    "change_level({requested}): out of range (1..={available})"
                )
            }
            LevelError::NotLoaded => write!(f, "load a level sheet first"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Decoded RGBA pixel grid holding the stacked level layouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSheet {
    width: u32,
    height: u32,
    /// Row-major, top row first
    pixels: Vec<[u8; 4]>,
}

impl LevelSheet {
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build from flat RGBA bytes (4 per pixel), as image decoders hand out
    pub fn from_flat_rgba(width: u32, height: u32, data: &[u8]) -> Self {
        let pixels = data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y); coordinates outside the sheet read as fully
    /// transparent, so undersized sheets simply yield fewer bricks
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Grid geometry mapping sheet pixels to on-field bricks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Level size in brick cells
    pub level_width: u32,
    pub level_height: u32,
    /// Brick size in field pixels
    pub brick_width: f32,
    pub brick_height: f32,
    /// Field-pixel offset of the brick grid's top-left corner
    pub brick_x_offset: f32,
    pub brick_y_offset: f32,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            level_width: LEVEL_WIDTH_CELLS,
            level_height: LEVEL_HEIGHT_CELLS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_x_offset: BRICK_X_OFFSET,
            brick_y_offset: BRICK_Y_OFFSET,
        }
    }
}

/// Generate the brick sequence for a 1-based level number
///
/// Bricks are emitted row-major, top row first, left to right. The resolver's
/// first-hit rule leans on this order, so it must stay stable. Each cell gets
/// a one-pixel gap on top of the brick extent (the `+ col` / `+ row` terms).
pub fn generate_bricks(sheet: &LevelSheet, layout: &LevelLayout, num: u32) -> Vec<Brick> {
    let mut bricks = Vec::new();
    let row_base = (num - 1) * layout.level_height;

    for row in 0..layout.level_height {
        for col in 0..layout.level_width {
            let pixel = sheet.pixel(col, row_base + row);

            // Transparent pixel, no brick
            if pixel[3] == 0 {
                continue;
            }

            let pos = Vec2::new(
                col as f32 + layout.brick_x_offset + col as f32 * layout.brick_width,
                row as f32 + layout.brick_y_offset + row as f32 * layout.brick_height,
            );
            bricks.push(Brick::new(
                pos,
                layout.brick_width,
                layout.brick_height,
                pixel,
            ));
        }
    }

    bricks
}

/// Owns the current level's bricks and the progression state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelManager {
    current_level: u32,
    number_of_levels: u32,
    layout: LevelLayout,
    sheet: Option<LevelSheet>,
    /// Current level's bricks in generation order; the resolver toggles
    /// `visible` in place
    pub bricks: Vec<Brick>,
}

impl LevelManager {
    /// Empty manager: no sheet, no levels, placeholder level 0
    pub fn new() -> Self {
        Self {
            current_level: 0,
            number_of_levels: 0,
            layout: LevelLayout::default(),
            sheet: None,
            bricks: Vec::new(),
        }
    }

    /// Install a level sheet and its grid geometry
    ///
    /// Resets progression to the unloaded placeholder: the caller picks the
    /// starting level with [`LevelManager::change_level`] afterwards.
    pub fn load_levels(&mut self, sheet: LevelSheet, layout: LevelLayout) {
        self.current_level = 0;
        self.bricks.clear();
        self.number_of_levels = if layout.level_height == 0 {
            0
        } else {
            sheet.height() / layout.level_height
        };
        self.layout = layout;
        self.sheet = Some(sheet);
        log::info!(
            "Level sheet loaded: {} level(s) of {}x{} cells",
            self.number_of_levels,
            layout.level_width,
            layout.level_height
        );
    }

    /// 1-based current level; 0 until a level is selected
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn number_of_levels(&self) -> u32 {
        self.number_of_levels
    }

    /// True iff every brick is cleared; vacuously true with no bricks
    pub fn is_current_level_won(&self) -> bool {
        self.bricks.iter().all(|brick| !brick.visible)
    }

    pub fn has_next_level(&self) -> bool {
        self.current_level < self.number_of_levels
    }

    pub fn on_last_level(&self) -> bool {
        self.current_level == self.number_of_levels
    }

    /// Regenerate the brick set for the given 1-based level
    pub fn change_level(&mut self, num: u32) -> Result<(), LevelError> {
        if num < 1 || num > self.number_of_levels {
            return Err(LevelError::OutOfRange {
                requested: num,
                available: self.number_of_levels,
            });
        }

        let Some(sheet) = &self.sheet else {
            return Err(LevelError::NotLoaded);
        };

        self.bricks = generate_bricks(sheet, &self.layout, num);
        self.current_level = num;
        log::info!("Level {}: {} bricks", num, self.bricks.len());
        Ok(())
    }

    pub fn goto_next_level(&mut self) -> Result<(), LevelError> {
        self.change_level(self.current_level + 1)
    }
}

impl Default for LevelManager {
    fn default() -> Self {
        Self::new()
    }
}
