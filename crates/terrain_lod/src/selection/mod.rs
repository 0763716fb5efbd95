//! Tile selection policies.
//!
//! Two interchangeable policies decide which tiles to draw each frame:
//!
//! - [`RecursiveSelector`]: walks the quadtree and subdivides while the
//!   projected screen-space error exceeds the budget.
//! - [`BandedSelector`]: assigns levels on a flat 4x4 grid from viewer
//!   distance, with hysteresis and a cooldown to suppress flicker.
//!
//! Both sit behind [`TileSelector`] so callers pick one at configuration
//! time. The underlying algorithms are also exposed as pure functions
//! ([`select_recursive`], [`select_banded`]) that take every input
//! explicitly, including the banded hysteresis state.

pub mod banded;
pub mod hysteresis;
pub mod recursive;
pub mod stats;
pub mod tile;

use glam::Vec3;

pub use banded::{select_banded, BandGrid, BandedInput, BandedOutput, BandedSelector};
pub use hysteresis::{BandState, HysteresisState};
pub use recursive::{select_recursive, RecursiveInput, RecursiveSelector};
pub use stats::{LevelCounts, SelectionStats};
pub use tile::{unit_to_world, AtlasRegion, Tile};

use crate::frustum::Frustum;

/// Per-frame viewer input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
  /// Viewer position in world space.
  pub position: Vec3,
  /// Seconds since the previous selection call.
  pub elapsed: f32,
}

impl ViewState {
  pub fn new(position: Vec3, elapsed: f32) -> Self {
    Self { position, elapsed }
  }

  /// A view with no elapsed time.
  pub fn at(position: Vec3) -> Self {
    Self::new(position, 0.0)
  }
}

/// A tile selection policy.
///
/// `out` is cleared and refilled with the selected tiles. Implementations
/// never emit overlapping footprints.
pub trait TileSelector {
  /// Short name for logs.
  fn name(&self) -> &'static str;

  /// Select tiles for `view` and `frustum` into `out`.
  fn select_tiles(&mut self, view: &ViewState, frustum: &Frustum, out: &mut Vec<Tile>) -> SelectionStats;
}
