//! Tile - one renderable terrain patch produced by a selector.
//!
//! Tiles are transient: built fresh on every selection call, with no
//! identity carried across frames.

use glam::{Mat4, Vec2, Vec3};

use crate::constants::cells_per_tile;
use crate::quadtree::TileBounds;

/// Sub-rectangle of a texture sampled by one tile.
///
/// `offset + scale` never leaves [0, 1]². When several cells share one
/// coarse texture, their regions partition the unit square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtlasRegion {
  pub offset: Vec2,
  pub scale: Vec2,
}

impl AtlasRegion {
  /// The whole texture.
  pub const FULL: Self = Self {
    offset: Vec2::ZERO,
    scale: Vec2::ONE,
  };

  /// Region of a level-`level` texture covering finest-grid cell
  /// `(cell_x, cell_z)`.
  ///
  /// A level-`l` texture spans `n = 2^(2 - l)` cells per axis, so each cell
  /// samples a `1/n` square at its position inside the block.
  pub fn for_cell(level: u8, cell_x: u32, cell_z: u32) -> Self {
    let n = cells_per_tile(level) as u32;
    let scale = 1.0 / n as f32;
    Self {
      offset: Vec2::new((cell_x % n) as f32 * scale, (cell_z % n) as f32 * scale),
      scale: Vec2::splat(scale),
    }
  }

  /// Whether this is the whole texture.
  #[inline]
  pub fn is_full(&self) -> bool {
    *self == Self::FULL
  }
}

impl Default for AtlasRegion {
  fn default() -> Self {
    Self::FULL
  }
}

/// A selected terrain tile, ready for instance building.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
  /// Detail level (0 = coarsest).
  pub level: u8,
  /// Grid X of the texture block at `level`.
  pub grid_x: u32,
  /// Grid Z of the texture block at `level`.
  pub grid_z: u32,
  pub world_min_x: f32,
  pub world_min_z: f32,
  /// Side length of the square footprint.
  pub world_size: f32,
  pub height_texture_index: u32,
  pub color_texture_index: u32,
  pub normal_texture_index: u32,
  pub atlas: AtlasRegion,
  /// Maps the unit [0,1]² reference mesh onto the footprint.
  pub world_transform: Mat4,
}

impl Tile {
  /// Build a tile whose height, color and normal maps share one texture set.
  pub fn new(
    level: u8,
    grid_x: u32,
    grid_z: u32,
    bounds: &TileBounds,
    texture_index: u32,
    atlas: AtlasRegion,
  ) -> Self {
    debug_assert!(
      (bounds.width() - bounds.depth()).abs() <= f32::EPSILON * bounds.width().max(1.0),
      "tiles are square"
    );
    Self {
      level,
      grid_x,
      grid_z,
      world_min_x: bounds.min_x,
      world_min_z: bounds.min_z,
      world_size: bounds.width(),
      height_texture_index: texture_index,
      color_texture_index: texture_index,
      normal_texture_index: texture_index,
      atlas,
      world_transform: unit_to_world(bounds.min_x, bounds.min_z, bounds.width()),
    }
  }

  /// World footprint.
  #[inline]
  pub fn bounds(&self) -> TileBounds {
    TileBounds::from_min_size(self.world_min_x, self.world_min_z, self.world_size)
  }
}

/// Scale the unit square by `size` on XZ (Y unscaled), then translate to
/// `(min_x, 0, min_z)`.
#[inline]
pub fn unit_to_world(min_x: f32, min_z: f32, size: f32) -> Mat4 {
  Mat4::from_translation(Vec3::new(min_x, 0.0, min_z)) * Mat4::from_scale(Vec3::new(size, 1.0, size))
}
