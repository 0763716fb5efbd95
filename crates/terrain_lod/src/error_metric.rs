//! Screen-space error projection.
//!
//! ```text
//! error_px = geometric_error[level] * screen_height / (2 * d * tan(fov_y / 2))
//! ```
//!
//! `d` is the Euclidean distance from the viewer to the node's bounds
//! center, clamped to at least [`MIN_ERROR_DISTANCE`].

use glam::Vec3;

use crate::config::TerrainConfig;
use crate::constants::{LEVEL_COUNT, MAX_LEVEL, MIN_ERROR_DISTANCE};
use crate::quadtree::TileBounds;

/// Projects per-level geometric error into pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenSpaceErrorEstimator {
  /// Pixels covered by one world unit at distance 1.
  /// pixels_per_unit = screen_height / (2 * tan(fov_y / 2))
  pub pixels_per_unit: f32,
  /// Geometric error per level (index = level).
  pub geometric_error: [f32; LEVEL_COUNT],
  /// Vertical coordinate used for node centers.
  pub center_y: f32,
}

impl ScreenSpaceErrorEstimator {
  pub fn new(config: &TerrainConfig) -> Self {
    Self {
      pixels_per_unit: config.screen_height / (2.0 * (config.fov_y * 0.5).tan()),
      geometric_error: config.geometric_error,
      center_y: config.culling_center_y(),
    }
  }

  /// Projected error in pixels for `level` seen from `distance`.
  #[inline]
  pub fn projected_error(&self, level: u8, distance: f32) -> f32 {
    let distance = distance.max(MIN_ERROR_DISTANCE);
    self.geometric_error[level.min(MAX_LEVEL) as usize] * self.pixels_per_unit / distance
  }

  /// World-space center used for distance measurement.
  #[inline]
  pub fn node_center(&self, bounds: &TileBounds) -> Vec3 {
    let center = bounds.center();
    Vec3::new(center.x, self.center_y, center.y)
  }

  /// Projected error of a node at `level` with `bounds`, seen from `viewer`.
  #[inline]
  pub fn node_error(&self, level: u8, bounds: &TileBounds, viewer: Vec3) -> f32 {
    self.projected_error(level, viewer.distance(self.node_center(bounds)))
  }

  /// Distance beyond which a node at `level` meets `max_error`.
  ///
  /// Nodes farther than this are not subdivided.
  pub fn acceptable_distance(&self, level: u8, max_error: f32) -> f32 {
    self.geometric_error[level.min(MAX_LEVEL) as usize] * self.pixels_per_unit / max_error
  }
}

#[cfg(test)]
mod tests {
  use std::f32::consts::FRAC_PI_2;

  use super::*;

  fn estimator() -> ScreenSpaceErrorEstimator {
    ScreenSpaceErrorEstimator::new(&TerrainConfig::default())
  }

  /// With a 90 degree FOV, tan(45) = 1 so pixels_per_unit = height / 2.
  #[test]
  fn test_pixels_per_unit() {
    let config = TerrainConfig {
      fov_y: FRAC_PI_2,
      screen_height: 1000.0,
      ..Default::default()
    };
    let e = ScreenSpaceErrorEstimator::new(&config);
    assert!((e.pixels_per_unit - 500.0).abs() < 1e-3);
    // 50 units of error at distance 100 → 50 * 500 / 100 = 250 px
    assert!((e.projected_error(0, 100.0) - 250.0).abs() < 1e-2);
  }

  /// Error strictly decreases with distance at a fixed level.
  #[test]
  fn test_error_decreases_with_distance() {
    let e = estimator();
    for level in 0..=MAX_LEVEL {
      let mut previous = f32::INFINITY;
      for distance in [1.5, 2.0, 10.0, 100.0, 1000.0, 10_000.0] {
        let error = e.projected_error(level, distance);
        assert!(
          error < previous,
          "level {} error must drop at distance {}",
          level,
          distance
        );
        previous = error;
      }
    }
  }

  /// Error strictly decreases with level at a fixed distance.
  #[test]
  fn test_error_decreases_with_level() {
    let e = estimator();
    for distance in [1.0, 50.0, 500.0] {
      let errors: Vec<f32> = (0..=MAX_LEVEL).map(|l| e.projected_error(l, distance)).collect();
      assert!(errors.windows(2).all(|w| w[1] < w[0]), "{:?}", errors);
    }
  }

  /// Distances under one unit clamp instead of blowing up.
  #[test]
  fn test_zero_distance_clamped() {
    let e = estimator();
    let at_zero = e.projected_error(2, 0.0);
    assert!(at_zero.is_finite());
    assert_eq!(at_zero, e.projected_error(2, MIN_ERROR_DISTANCE));
    assert_eq!(e.projected_error(2, 0.25), at_zero);
  }

  /// Node distance includes the height component.
  #[test]
  fn test_node_error_uses_3d_distance() {
    let e = estimator();
    let bounds = TileBounds::new(-10.0, -10.0, 10.0, 10.0);
    let above = Vec3::new(0.0, e.center_y + 100.0, 0.0);
    assert_eq!(e.node_error(1, &bounds, above), e.projected_error(1, 100.0));
  }

  /// At the acceptable distance the projected error equals the budget.
  #[test]
  fn test_acceptable_distance_round_trip() {
    let e = estimator();
    let d = e.acceptable_distance(0, 4.0);
    assert!((e.projected_error(0, d) - 4.0).abs() < 1e-3);
  }
}
