//! Per-call selection statistics.

use crate::constants::LEVEL_COUNT;

use super::Tile;

/// Counters gathered during one selection call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionStats {
	/// Visibility tests performed.
	pub visibility_tests: usize,
	/// Nodes or cells rejected by the visibility test.
	pub culled: usize,
	/// Quadtree nodes descended into.
	pub subdivided: usize,
	/// Banded blocks emitted as a single tile.
	pub merged_blocks: usize,
	/// Banded level transitions applied this call.
	pub level_changes: usize,
	/// Tiles written to the output.
	pub tiles_emitted: usize,
}

impl SelectionStats {
	/// Visibility tests that passed.
	#[inline]
	pub fn visible(&self) -> usize {
		self.visibility_tests - self.culled
	}
}

/// Tile count per level (index = level).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts(pub [usize; LEVEL_COUNT]);

impl LevelCounts {
	/// Count `tiles` by level.
	pub fn from_tiles(tiles: &[Tile]) -> Self {
		let mut counts = [0; LEVEL_COUNT];
		for tile in tiles {
			if let Some(slot) = counts.get_mut(tile.level as usize) {
				*slot += 1;
			}
		}
		Self(counts)
	}

	/// Tiles at `level`.
	#[inline]
	pub fn get(&self, level: u8) -> usize {
		self.0.get(level as usize).copied().unwrap_or(0)
	}

	#[inline]
	pub fn total(&self) -> usize {
		self.0.iter().sum()
	}
}

impl std::fmt::Display for LevelCounts {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "L0: {} L1: {} L2: {}", self.0[0], self.0[1], self.0[2])
	}
}
