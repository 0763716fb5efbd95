//! Fixed layout constants for the three-level terrain tile hierarchy.
//!
//! # Level Convention
//!
//! Level 0 = coarsest (one tile covers the whole terrain), level 2 = finest.
//! This is the reverse of the octree-style "LOD 0 = finest" convention, and
//! matches how the terrain textures are exported: one coarse set, a 2x2 set
//! and a 4x4 set.
//!
//! ```text
//! Tiles per axis = 2^level
//!
//!   level 0        level 1          level 2
//! ┌─────────┐   ┌────┬────┐   ┌──┬──┬──┬──┐
//! │         │   │ 3  │ 4  │   │17│18│19│20│
//! │    0    │   ├────┼────┤   ├──┼──┼──┼──┤
//! │         │   │ 1  │ 2  │   │..│..│..│..│
//! └─────────┘   └────┴────┘   ├──┼──┼──┼──┤
//!                             │ 5│ 6│ 7│ 8│
//!                             └──┴──┴──┴──┘
//!   (+Z up, +X right; numbers are texture set indices)
//! ```
//!
//! # Texture Array Layout
//!
//! ```text
//! [0]      level 0 (1 set)
//! [1..=4]  level 1 (2x2 sets, row-major by Z then X)
//! [5..=20] level 2 (4x4 sets, row-major by Z then X)
//! ```

/// Finest level in the hierarchy.
pub const MAX_LEVEL: u8 = 2;

/// Number of detail levels (0..=MAX_LEVEL).
pub const LEVEL_COUNT: usize = MAX_LEVEL as usize + 1;

/// Cells per axis of the flat grid used by the banded policy.
///
/// Equal to the tile count per axis at the finest level.
pub const GRID_SIZE: usize = 1 << MAX_LEVEL;

/// Total cells in the banded grid.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// Total texture sets across all levels (1 + 4 + 16).
pub const TOTAL_TEXTURE_SETS: usize = 21;

/// First texture set index used by each level.
pub const LEVEL_TEXTURE_BASE: [u32; LEVEL_COUNT] = [0, 1, 5];

/// Default instance buffer capacity (tiles per frame).
pub const DEFAULT_INSTANCE_CAPACITY: usize = 64;

/// Default number of frame resources in flight.
pub const DEFAULT_FRAMES_IN_FLIGHT: usize = 3;

/// Minimum viewer distance used by the screen-space error projection.
pub const MIN_ERROR_DISTANCE: f32 = 1.0;

/// Number of tiles along one axis at `level`.
#[inline]
pub const fn tiles_per_axis(level: u8) -> u32 {
  1 << level
}

/// Number of finest-grid cells along one axis covered by one tile at `level`.
#[inline]
pub const fn cells_per_tile(level: u8) -> usize {
  1 << (MAX_LEVEL - level)
}

/// Texture set index for a tile.
///
/// Pure function of `(level, grid_x, grid_z)`. Levels past [`MAX_LEVEL`]
/// fall back to the coarse set.
#[inline]
pub const fn texture_index(level: u8, grid_x: u32, grid_z: u32) -> u32 {
  match level {
    0 => 0,
    1 | 2 => LEVEL_TEXTURE_BASE[level as usize] + grid_z * tiles_per_axis(level) + grid_x,
    _ => 0,
  }
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
