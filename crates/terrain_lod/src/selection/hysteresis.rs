//! Hysteresis state for the banded policy.
//!
//! State is an explicit value: callers pass the previous frame's state in
//! and receive the next one back. Nothing is hidden in statics.
//!
//! A level change needs two things:
//! - the distance strictly crosses the threshold for the current level, and
//! - the cooldown left by the previous change has run out.
//!
//! Applying a change resets the cooldown, so a viewer oscillating across a
//! boundary produces at most one change per cooldown period.

use crate::config::{BandMode, BandThresholds, BandedConfig};
use crate::constants::{GRID_CELLS, MAX_LEVEL};

/// Level and cooldown for one banded region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HysteresisState {
	/// Level currently drawn.
	pub current_level: u8,
	/// Seconds until another change is allowed. Never negative.
	pub cooldown_remaining: f32,
}

impl HysteresisState {
	/// Fresh state at `level` with no cooldown pending.
	pub fn new(level: u8) -> Self {
		Self {
			current_level: level.min(MAX_LEVEL),
			cooldown_remaining: 0.0,
		}
	}

	/// Whether a change is currently blocked.
	#[inline]
	pub fn is_cooling_down(&self) -> bool {
		self.cooldown_remaining > 0.0
	}

	/// Advance by `elapsed` seconds and apply at most one level step.
	///
	/// The cooldown is decremented first. If it has expired and the distance
	/// calls for a different level, that level is applied and the cooldown
	/// restarts at `cooldown`.
	#[must_use]
	pub fn advance(self, distance: f32, elapsed: f32, thresholds: &BandThresholds, cooldown: f32) -> Self {
		let cooldown_remaining = (self.cooldown_remaining - elapsed.max(0.0)).max(0.0);
		let candidate = thresholds.step(self.current_level, distance);

		if cooldown_remaining <= 0.0 && candidate != self.current_level {
			Self {
				current_level: candidate,
				cooldown_remaining: cooldown,
			}
		} else {
			Self {
				current_level: self.current_level,
				cooldown_remaining,
			}
		}
	}
}

/// Hysteresis state for the whole banded grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BandState {
	/// One level shared by every cell.
	Uniform(HysteresisState),
	/// One state per cell, row-major with Z as the row.
	PerCell([HysteresisState; GRID_CELLS]),
}

impl BandState {
	/// State before the first frame.
	pub fn initial(config: &BandedConfig) -> Self {
		let state = HysteresisState::new(config.initial_level);
		match config.mode {
			BandMode::Uniform => Self::Uniform(state),
			BandMode::PerCell => Self::PerCell([state; GRID_CELLS]),
		}
	}

	/// Mode this state belongs to.
	pub fn mode(&self) -> BandMode {
		match self {
			Self::Uniform(_) => BandMode::Uniform,
			Self::PerCell(_) => BandMode::PerCell,
		}
	}

	/// Level assigned to cell `index`.
	#[inline]
	pub fn cell_level(&self, index: usize) -> u8 {
		match self {
			Self::Uniform(state) => state.current_level,
			Self::PerCell(cells) => cells[index].current_level,
		}
	}

	/// Levels of all cells.
	pub fn cell_levels(&self) -> [u8; GRID_CELLS] {
		std::array::from_fn(|i| self.cell_level(i))
	}
}
