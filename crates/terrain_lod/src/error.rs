//! Configuration errors.
//!
//! Selection itself never fails at runtime: distance singularities are
//! clamped and capacity overflow truncates. The only fallible step is
//! validating the static configuration before the first frame.

use thiserror::Error;

/// Result alias for configuration validation.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid static configuration. Fatal at initialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("terrain world size must be positive and finite, got {0}")]
  InvalidTerrainSize(f32),

  #[error("terrain max height must be non-negative and finite, got {0}")]
  InvalidMaxHeight(f32),

  #[error("vertical padding must be finite and leave a non-negative culling height, got {0}")]
  InvalidVerticalPadding(f32),

  #[error("vertical field of view must be in (0, pi) radians, got {0}")]
  InvalidFieldOfView(f32),

  #[error("viewport height must be positive, got {0}")]
  InvalidScreenHeight(f32),

  #[error("max screen-space error must be positive and finite, got {0}")]
  InvalidErrorBudget(f32),

  #[error("geometric error must be positive and strictly decreasing per level, got {0:?}")]
  GeometricErrorNotDecreasing([f32; 3]),

  #[error("instance capacity must be at least 1")]
  ZeroInstanceCapacity,

  #[error("frames in flight must be at least 1")]
  ZeroFramesInFlight,

  #[error(
    "band thresholds for level {level} must satisfy 0 < finer ({finer}) < coarser ({coarser})"
  )]
  InvalidBandThreshold { level: u8, finer: f32, coarser: f32 },

  #[error("band thresholds must shrink toward finer levels: {outer} then {inner}")]
  BandsNotNested { outer: f32, inner: f32 },

  #[error("hysteresis cooldown must be non-negative and finite, got {0}")]
  InvalidCooldown(f32),

  #[error("initial level {0} exceeds the finest level")]
  InvalidInitialLevel(u8),
}
