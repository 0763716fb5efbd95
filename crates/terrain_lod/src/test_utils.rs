//! Test utilities shared by the selection tests.
//!
//! Provides frustum fixtures and tile-set assertions so each policy can be
//! tested against identical scenarios.

use glam::{Mat4, Vec3};

use crate::config::TerrainConfig;
use crate::frustum::{Frustum, Plane};
use crate::selection::Tile;

// =============================================================================
// Frustum Fixtures
// =============================================================================

/// Axis-aligned box "frustum": everything inside `[min, max]` is visible.
pub fn box_frustum(min: Vec3, max: Vec3) -> Frustum {
  Frustum::from_planes([
    Plane::from_point_normal(min, Vec3::X),
    Plane::from_point_normal(max, Vec3::NEG_X),
    Plane::from_point_normal(min, Vec3::Y),
    Plane::from_point_normal(max, Vec3::NEG_Y),
    Plane::from_point_normal(min, Vec3::Z),
    Plane::from_point_normal(max, Vec3::NEG_Z),
  ])
}

/// A frustum large enough to see any terrain used in tests.
pub fn see_everything() -> Frustum {
  box_frustum(Vec3::splat(-1.0e6), Vec3::splat(1.0e6))
}

/// Frustum that only sees world X in `[min_x, max_x]`.
pub fn x_slab(min_x: f32, max_x: f32) -> Frustum {
  box_frustum(
    Vec3::new(min_x, -1.0e6, -1.0e6),
    Vec3::new(max_x, 1.0e6, 1.0e6),
  )
}

/// Perspective camera at `eye` looking along `direction`.
pub fn camera_frustum(
  eye: Vec3,
  direction: Vec3,
  fov_y: f32,
  aspect: f32,
  near: f32,
  far: f32,
) -> Frustum {
  let up = if direction.normalize().dot(Vec3::Y).abs() > 0.99 {
    Vec3::Z
  } else {
    Vec3::Y
  };
  let view = Mat4::look_at_rh(eye, eye + direction, up);
  let projection = Mat4::perspective_rh(fov_y, aspect, near, far);
  Frustum::from_view_projection(projection * view)
}

/// Valid default config.
pub fn reference_config() -> TerrainConfig {
  TerrainConfig::default()
}

// =============================================================================
// Tile Assertions
// =============================================================================

/// Sum of tile footprint areas.
pub fn covered_area(tiles: &[Tile]) -> f32 {
  tiles.iter().map(|t| t.world_size * t.world_size).sum()
}

/// Assert no two tiles overlap in world XZ.
pub fn assert_no_overlap(tiles: &[Tile]) {
  for (i, a) in tiles.iter().enumerate() {
    for b in tiles.iter().skip(i + 1) {
      assert!(
        !a.bounds().overlaps_interior(&b.bounds()),
        "tiles overlap: {:?} and {:?}",
        a.bounds(),
        b.bounds()
      );
    }
  }
}

/// Assert every atlas region lies within [0, 1]².
pub fn assert_atlas_in_unit_square(tiles: &[Tile]) {
  for tile in tiles {
    let region = tile.atlas;
    let end = region.offset + region.scale;
    assert!(
      region.offset.min_element() >= 0.0 && end.max_element() <= 1.0,
      "atlas {:?} escapes [0,1]",
      region
    );
  }
}
