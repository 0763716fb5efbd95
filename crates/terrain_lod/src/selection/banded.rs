//! Banded selection on a flat 4x4 grid.
//!
//! Each frame:
//! 1. Advance the hysteresis state from the viewer distance and elapsed time.
//! 2. Group cells by assigned level, finest first.
//! 3. For each texture block at that level, emit one tile for the whole
//!    block when every cell in it is at that level and visible. Otherwise
//!    emit each visible cell on its own, sampling its sub-region of the
//!    block's texture.
//!
//! ```text
//! level 2: 1x1 cell per texture   atlas = full
//! level 1: 2x2 cells per texture  atlas = quarter at (cx % 2, cz % 2) / 2
//! level 0: 4x4 cells per texture  atlas = sixteenth at (cx, cz) / 4
//! ```
//!
//! Every cell is emitted at most once, so tiles never overlap.

use glam::Vec2;

use super::{AtlasRegion, BandState, HysteresisState, SelectionStats, Tile, TileSelector, ViewState};
use crate::config::{BandMode, BandedConfig, TerrainConfig};
use crate::constants::{cells_per_tile, texture_index, GRID_CELLS, GRID_SIZE, MAX_LEVEL};
use crate::error::Result;
use crate::frustum::{Frustum, VisibilityTest};
use crate::quadtree::{SpatialHierarchy, TileBounds};

/// Finest-level quadtree nodes laid out as a flat grid.
///
/// Texture blocks are the quadtree nodes at the block's level.
#[derive(Clone, Debug, PartialEq)]
pub struct BandGrid {
	hierarchy: SpatialHierarchy,
	cells: [TileBounds; GRID_CELLS],
}

impl BandGrid {
	/// Grid over `[-size/2, size/2]²`.
	pub fn new(world_size: f32) -> Result<Self> {
		Ok(Self::from_hierarchy(SpatialHierarchy::build(world_size)?))
	}

	/// Grid over the finest level of an existing hierarchy.
	pub fn from_hierarchy(hierarchy: SpatialHierarchy) -> Self {
		let mut cells = [TileBounds::centered_square(0.0); GRID_CELLS];
		for id in hierarchy.level_nodes(MAX_LEVEL) {
			let node = hierarchy.node(id);
			cells[cell_index(node.grid_x, node.grid_z)] = node.bounds;
		}
		Self { hierarchy, cells }
	}

	#[inline]
	pub fn world_size(&self) -> f32 {
		self.hierarchy.world_size()
	}

	/// Terrain center on XZ.
	#[inline]
	pub fn center(&self) -> Vec2 {
		Vec2::ZERO
	}

	/// Footprint of cell `index`.
	#[inline]
	pub fn cell(&self, index: usize) -> &TileBounds {
		&self.cells[index]
	}

	/// All cell footprints, row-major with Z as the row.
	#[inline]
	pub fn cells(&self) -> &[TileBounds; GRID_CELLS] {
		&self.cells
	}

	/// Footprint of texture block `(block_x, block_z)` at `level`, or None
	/// outside the grid.
	pub fn block(&self, level: u8, block_x: u32, block_z: u32) -> Option<TileBounds> {
		self.hierarchy.find(level, block_x, block_z).map(|id| self.hierarchy.node(id).bounds)
	}
}

/// Row-major index of cell `(cx, cz)`.
#[inline]
pub fn cell_index(cx: u32, cz: u32) -> usize {
	(cz as usize) * GRID_SIZE + cx as usize
}

/// Cell coordinates of row-major `index`.
#[inline]
pub fn cell_coords(index: usize) -> (u32, u32) {
	((index % GRID_SIZE) as u32, (index / GRID_SIZE) as u32)
}

/// Everything one banded selection needs besides the carried state.
pub struct BandedInput<'a> {
	pub grid: &'a BandGrid,
	pub config: &'a BandedConfig,
	pub visibility: &'a VisibilityTest,
	pub view: ViewState,
	pub frustum: &'a Frustum,
}

/// Result of one banded selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandedOutput {
	/// State to pass into the next call.
	pub state: BandState,
	pub stats: SelectionStats,
}

/// Advance `state` and fill `out` with this frame's tiles.
///
/// A state whose mode does not match `input.config` is discarded and
/// restarted from the configured initial level.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "selection::banded"))]
pub fn select_banded(input: &BandedInput<'_>, state: BandState, out: &mut Vec<Tile>) -> BandedOutput {
	out.clear();
	let mut stats = SelectionStats::default();

	let state = if state.mode() == input.config.mode {
		state
	} else {
		tracing::warn!(
			expected = ?input.config.mode,
			got = ?state.mode(),
			"band state mode mismatch, resetting"
		);
		BandState::initial(input.config)
	};
	let state = advance_state(input, state, &mut stats);

	let levels = state.cell_levels();
	let visible: [bool; GRID_CELLS] = std::array::from_fn(|i| {
		input.visibility.is_visible(input.grid.cell(i), input.frustum)
	});
	stats.visibility_tests = GRID_CELLS;
	stats.culled = visible.iter().filter(|v| !**v).count();

	for level in (0..=MAX_LEVEL).rev() {
		emit_level(input.grid, level, &levels, &visible, out, &mut stats);
	}

	stats.tiles_emitted = out.len();
	BandedOutput { state, stats }
}

fn advance_state(input: &BandedInput<'_>, state: BandState, stats: &mut SelectionStats) -> BandState {
	let config = input.config;
	let viewer = Vec2::new(input.view.position.x, input.view.position.z);
	let elapsed = input.view.elapsed;

	let mut step = |before: HysteresisState, distance: f32| {
		let after = before.advance(distance, elapsed, &config.thresholds, config.cooldown);
		if after.current_level != before.current_level {
			stats.level_changes += 1;
			tracing::debug!(
				from = before.current_level,
				to = after.current_level,
				distance,
				"band level changed"
			);
		}
		after
	};

	match state {
		BandState::Uniform(current) => {
			let distance = viewer.distance(input.grid.center());
			BandState::Uniform(step(current, distance))
		}
		BandState::PerCell(cells) => BandState::PerCell(std::array::from_fn(|i| {
			let distance = input.grid.cell(i).distance_xz(viewer.x, viewer.y);
			step(cells[i], distance)
		})),
	}
}

fn emit_level(
	grid: &BandGrid,
	level: u8,
	levels: &[u8; GRID_CELLS],
	visible: &[bool; GRID_CELLS],
	out: &mut Vec<Tile>,
	stats: &mut SelectionStats,
) {
	let n = cells_per_tile(level) as u32;
	let blocks = GRID_SIZE as u32 / n;

	for block_z in 0..blocks {
		for block_x in 0..blocks {
			let members = move || {
				(0..n).flat_map(move |lz| (0..n).map(move |lx| (block_x * n + lx, block_z * n + lz)))
			};

			let mut assigned = 0;
			let mut all_visible = true;
			for (cx, cz) in members() {
				let i = cell_index(cx, cz);
				if levels[i] == level {
					assigned += 1;
					all_visible &= visible[i];
				}
			}
			if assigned == 0 {
				continue;
			}

			let texture = texture_index(level, block_x, block_z);
			if assigned == n * n && all_visible {
				if let Some(bounds) = grid.block(level, block_x, block_z) {
					if n > 1 {
						stats.merged_blocks += 1;
					}
					out.push(Tile::new(level, block_x, block_z, &bounds, texture, AtlasRegion::FULL));
					continue;
				}
			}

			for (cx, cz) in members() {
				let i = cell_index(cx, cz);
				if levels[i] == level && visible[i] {
					out.push(Tile::new(
						level,
						block_x,
						block_z,
						grid.cell(i),
						texture,
						AtlasRegion::for_cell(level, cx, cz),
					));
				}
			}
		}
	}
}

/// Banded policy carrying its own hysteresis state between frames.
#[derive(Clone, Debug)]
pub struct BandedSelector {
	grid: BandGrid,
	config: BandedConfig,
	visibility: VisibilityTest,
	state: BandState,
}

impl BandedSelector {
	pub fn new(terrain: &TerrainConfig, config: BandedConfig) -> Result<Self> {
		terrain.validate()?;
		config.validate()?;
		Ok(Self {
			grid: BandGrid::new(terrain.world_size)?,
			visibility: VisibilityTest::new(terrain),
			state: BandState::initial(&config),
			config,
		})
	}

	#[inline]
	pub fn grid(&self) -> &BandGrid {
		&self.grid
	}

	#[inline]
	pub fn config(&self) -> &BandedConfig {
		&self.config
	}

	/// State carried into the next frame.
	#[inline]
	pub fn state(&self) -> &BandState {
		&self.state
	}

	/// Replace the carried state.
	pub fn set_state(&mut self, state: BandState) {
		self.state = state;
	}

	/// Level of the whole grid in uniform mode.
	pub fn uniform_level(&self) -> Option<u8> {
		match (&self.state, self.config.mode) {
			(BandState::Uniform(state), BandMode::Uniform) => Some(state.current_level),
			_ => None,
		}
	}

	/// Back to the initial level with no cooldown.
	pub fn reset(&mut self) {
		self.state = BandState::initial(&self.config);
	}
}

impl TileSelector for BandedSelector {
	fn name(&self) -> &'static str {
		match self.config.mode {
			BandMode::Uniform => "distance-bands",
			BandMode::PerCell => "distance-rings",
		}
	}

	fn select_tiles(&mut self, view: &ViewState, frustum: &Frustum, out: &mut Vec<Tile>) -> SelectionStats {
		let output = select_banded(
			&BandedInput {
				grid: &self.grid,
				config: &self.config,
				visibility: &self.visibility,
				view: *view,
				frustum,
			},
			self.state,
			out,
		);
		self.state = output.state;
		output.stats
	}
}

#[cfg(test)]
#[path = "banded_test.rs"]
mod banded_test;
