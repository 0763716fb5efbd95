//! TerrainConfig and BandedConfig - static configuration for tile selection.
//!
//! Both are plain values with defaults matching the reference terrain
//! (512 world units, 150 max height, 45 degree vertical FOV at 720 pixels).
//! Call `validate` once at startup; selection assumes a valid config.

use std::f32::consts::PI;

use crate::constants::{DEFAULT_FRAMES_IN_FLIGHT, DEFAULT_INSTANCE_CAPACITY, LEVEL_COUNT, MAX_LEVEL};
use crate::error::{ConfigError, Result};

/// Configuration shared by both selection policies and the instance builder.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainConfig {
  /// Side length of the square terrain footprint, centered on the origin.
  pub world_size: f32,

  /// Maximum terrain height in world units.
  pub max_height: f32,

  /// Extra vertical half-extent added to culling volumes so displaced
  /// geometry near the top of the range is not culled early.
  pub vertical_padding: f32,

  /// Vertical field of view in radians.
  pub fov_y: f32,

  /// Viewport height in pixels.
  pub screen_height: f32,

  /// Pixel error budget. Nodes projecting above this are subdivided.
  pub max_screen_error: f32,

  /// Worst-case vertical deviation per level (index = level).
  /// Must be strictly decreasing toward finer levels.
  pub geometric_error: [f32; LEVEL_COUNT],

  /// Maximum instance records per frame.
  pub instance_capacity: usize,

  /// Number of frame-indexed instance buffers rotated round-robin.
  pub frames_in_flight: usize,
}

impl TerrainConfig {
  /// Vertical center of the culling volume.
  #[inline]
  pub fn culling_center_y(&self) -> f32 {
    self.max_height * 0.5
  }

  /// Vertical half-extent of the culling volume.
  #[inline]
  pub fn culling_half_height(&self) -> f32 {
    self.max_height * 0.5 + self.vertical_padding
  }

  /// Check every field. Misconfiguration is fatal at init, never at runtime.
  pub fn validate(&self) -> Result<()> {
    if !(self.world_size.is_finite() && self.world_size > 0.0) {
      return Err(ConfigError::InvalidTerrainSize(self.world_size));
    }
    if !(self.max_height.is_finite() && self.max_height >= 0.0) {
      return Err(ConfigError::InvalidMaxHeight(self.max_height));
    }
    if !(self.vertical_padding.is_finite() && self.culling_half_height() >= 0.0) {
      return Err(ConfigError::InvalidVerticalPadding(self.vertical_padding));
    }
    if !(self.fov_y > 0.0 && self.fov_y < PI) {
      return Err(ConfigError::InvalidFieldOfView(self.fov_y));
    }
    if !(self.screen_height.is_finite() && self.screen_height > 0.0) {
      return Err(ConfigError::InvalidScreenHeight(self.screen_height));
    }
    if !(self.max_screen_error.is_finite() && self.max_screen_error > 0.0) {
      return Err(ConfigError::InvalidErrorBudget(self.max_screen_error));
    }
    let errors = self.geometric_error;
    let positive = errors.iter().all(|e| e.is_finite() && *e > 0.0);
    let decreasing = errors.windows(2).all(|w| w[1] < w[0]);
    if !(positive && decreasing) {
      return Err(ConfigError::GeometricErrorNotDecreasing(errors));
    }
    if self.instance_capacity == 0 {
      return Err(ConfigError::ZeroInstanceCapacity);
    }
    if self.frames_in_flight == 0 {
      return Err(ConfigError::ZeroFramesInFlight);
    }
    Ok(())
  }
}

impl Default for TerrainConfig {
  fn default() -> Self {
    Self {
      world_size: 512.0,
      max_height: 150.0,
      vertical_padding: 50.0,
      fov_y: 0.25 * PI,
      screen_height: 720.0,
      max_screen_error: 4.0,
      geometric_error: [50.0, 25.0, 12.5],
      instance_capacity: DEFAULT_INSTANCE_CAPACITY,
      frames_in_flight: DEFAULT_FRAMES_IN_FLIGHT,
    }
  }
}

/// How the banded policy measures distance and assigns levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BandMode {
  /// One level for the whole grid, driven by the XZ distance from the
  /// viewer to the terrain center.
  #[default]
  Uniform,
  /// Concentric rings: each cell tracks its own level from the distance to
  /// its nearest point.
  PerCell,
}

/// Asymmetric distance thresholds for one-step level transitions.
///
/// Index `l` describes the pair of levels `l` (coarser) and `l + 1` (finer):
/// - `finer[l]`: move from `l` to `l + 1` when distance drops strictly below.
/// - `coarser[l]`: move from `l + 1` to `l` when distance rises strictly above.
///
/// `finer[l] < coarser[l]` leaves a dead zone where neither fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandThresholds {
  pub finer: [f32; MAX_LEVEL as usize],
  pub coarser: [f32; MAX_LEVEL as usize],
}

impl BandThresholds {
  /// Whole-grid thresholds, measured from the terrain center.
  pub const UNIFORM: Self = Self {
    finer: [550.0, 250.0],
    coarser: [650.0, 350.0],
  };

  /// Ring thresholds scaled to the terrain size, measured to each cell's
  /// nearest point.
  pub fn rings(world_size: f32) -> Self {
    Self {
      finer: [world_size * 0.25, world_size * 0.10],
      coarser: [world_size * 0.30, world_size * 0.15],
    }
  }

  /// Next level after one hysteresis step from `current` at `distance`.
  ///
  /// Transitions move at most one level and require a strict crossing.
  #[inline]
  pub fn step(&self, current: u8, distance: f32) -> u8 {
    let current = current.min(MAX_LEVEL);
    if current < MAX_LEVEL && distance < self.finer[current as usize] {
      current + 1
    } else if current > 0 && distance > self.coarser[current as usize - 1] {
      current - 1
    } else {
      current
    }
  }

  fn validate(&self) -> Result<()> {
    for level in 0..MAX_LEVEL {
      let finer = self.finer[level as usize];
      let coarser = self.coarser[level as usize];
      if !(finer.is_finite() && coarser.is_finite() && finer > 0.0 && finer < coarser) {
        return Err(ConfigError::InvalidBandThreshold {
          level,
          finer,
          coarser,
        });
      }
    }
    for pair in [self.finer, self.coarser] {
      if let Some(w) = pair.windows(2).find(|w| w[1] >= w[0]) {
        return Err(ConfigError::BandsNotNested {
          outer: w[0],
          inner: w[1],
        });
      }
    }
    Ok(())
  }
}

impl Default for BandThresholds {
  fn default() -> Self {
    Self::UNIFORM
  }
}

/// Configuration for the banded (distance-ring) policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandedConfig {
  pub mode: BandMode,
  pub thresholds: BandThresholds,
  /// Seconds a level change blocks further changes.
  pub cooldown: f32,
  /// Level assigned before the first frame.
  pub initial_level: u8,
}

impl BandedConfig {
  /// Single-distance variant with the reference thresholds.
  pub fn uniform() -> Self {
    Self::default()
  }

  /// Ring variant with thresholds scaled to `world_size`.
  pub fn per_cell(world_size: f32) -> Self {
    Self {
      mode: BandMode::PerCell,
      thresholds: BandThresholds::rings(world_size),
      ..Self::default()
    }
  }

  pub fn validate(&self) -> Result<()> {
    self.thresholds.validate()?;
    if !(self.cooldown.is_finite() && self.cooldown >= 0.0) {
      return Err(ConfigError::InvalidCooldown(self.cooldown));
    }
    if self.initial_level > MAX_LEVEL {
      return Err(ConfigError::InvalidInitialLevel(self.initial_level));
    }
    Ok(())
  }
}

impl Default for BandedConfig {
  fn default() -> Self {
    Self {
      mode: BandMode::Uniform,
      thresholds: BandThresholds::UNIFORM,
      cooldown: 0.3,
      initial_level: MAX_LEVEL,
    }
  }
}

/// Which selector drives a [`crate::TerrainLod`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum SelectionPolicy {
  /// Recursive quadtree traversal with a screen-space error budget.
  #[default]
  ScreenSpaceError,
  /// Flat grid with distance bands and hysteresis.
  DistanceBands(BandedConfig),
}

impl SelectionPolicy {
  pub fn validate(&self) -> Result<()> {
    match self {
      Self::ScreenSpaceError => Ok(()),
      Self::DistanceBands(banded) => banded.validate(),
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
