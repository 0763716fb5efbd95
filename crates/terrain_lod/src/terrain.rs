//! TerrainLod - per-frame selection pipeline.
//!
//! Owns the configuration, the active selector, the frame ring of instance
//! batches, and metrics. One `update` per frame:
//!
//! ```text
//! ViewState + Frustum → selector → tiles → InstanceBatch (frame slot) → render
//! ```

use web_time::Instant;

use crate::config::{SelectionPolicy, TerrainConfig};
use crate::error::Result;
use crate::frame::FrameRing;
use crate::frustum::Frustum;
use crate::instance::InstanceBatch;
use crate::metrics::SelectionMetrics;
use crate::renderer::TerrainRenderer;
use crate::selection::{
  BandState, BandedSelector, LevelCounts, RecursiveSelector, SelectionStats, Tile, TileSelector, ViewState,
};

/// The selector chosen by a [`SelectionPolicy`].
#[derive(Clone, Debug)]
pub enum ActiveSelector {
  Recursive(RecursiveSelector),
  Banded(BandedSelector),
}

impl ActiveSelector {
  pub fn new(config: &TerrainConfig, policy: &SelectionPolicy) -> Result<Self> {
    Ok(match policy {
      SelectionPolicy::ScreenSpaceError => Self::Recursive(RecursiveSelector::new(config)?),
      SelectionPolicy::DistanceBands(banded) => Self::Banded(BandedSelector::new(config, *banded)?),
    })
  }

  /// Hysteresis state, for the banded policy.
  pub fn band_state(&self) -> Option<&BandState> {
    match self {
      Self::Recursive(_) => None,
      Self::Banded(banded) => Some(banded.state()),
    }
  }
}

impl TileSelector for ActiveSelector {
  fn name(&self) -> &'static str {
    match self {
      Self::Recursive(s) => s.name(),
      Self::Banded(s) => s.name(),
    }
  }

  fn select_tiles(&mut self, view: &ViewState, frustum: &Frustum, out: &mut Vec<Tile>) -> SelectionStats {
    match self {
      Self::Recursive(s) => s.select_tiles(view, frustum, out),
      Self::Banded(s) => s.select_tiles(view, frustum, out),
    }
  }
}

/// Summary of one `update`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
  /// Frame number, starting at 1.
  pub frame: u64,
  /// Frame-ring slot written this frame.
  pub slot: usize,
  pub counts: LevelCounts,
  pub stats: SelectionStats,
  /// Instances written to the slot.
  pub instances: usize,
  /// Tiles dropped for lack of capacity.
  pub dropped: usize,
  /// Whole-grid band level, for the uniform banded policy.
  pub band_level: Option<u8>,
}

impl FrameReport {
  #[inline]
  pub fn overflowed(&self) -> bool {
    self.dropped > 0
  }
}

/// Terrain tile selection for one terrain.
pub struct TerrainLod {
  config: TerrainConfig,
  policy: SelectionPolicy,
  selector: ActiveSelector,
  tiles: Vec<Tile>,
  frames: FrameRing<InstanceBatch>,
  /// Accumulated selection metrics (empty without the `metrics` feature).
  pub metrics: SelectionMetrics,
}

impl TerrainLod {
  /// Validate `config` and `policy` and build the selector.
  pub fn new(config: TerrainConfig, policy: SelectionPolicy) -> Result<Self> {
    config.validate()?;
    policy.validate()?;
    let selector = ActiveSelector::new(&config, &policy)?;
    let capacity = config.instance_capacity;

    tracing::info!(
      policy = selector.name(),
      world_size = config.world_size,
      capacity,
      frames_in_flight = config.frames_in_flight,
      "terrain lod ready"
    );

    Ok(Self {
      frames: FrameRing::new(config.frames_in_flight, || InstanceBatch::with_capacity(capacity)),
      tiles: Vec::with_capacity(capacity),
      metrics: SelectionMetrics::new(),
      config,
      policy,
      selector,
    })
  }

  #[inline]
  pub fn config(&self) -> &TerrainConfig {
    &self.config
  }

  #[inline]
  pub fn policy(&self) -> &SelectionPolicy {
    &self.policy
  }

  #[inline]
  pub fn selector(&self) -> &ActiveSelector {
    &self.selector
  }

  /// Switch policy. Banded hysteresis restarts from its initial level.
  pub fn set_policy(&mut self, policy: SelectionPolicy) -> Result<()> {
    policy.validate()?;
    self.selector = ActiveSelector::new(&self.config, &policy)?;
    self.policy = policy;
    tracing::info!(policy = self.selector.name(), "selection policy changed");
    Ok(())
  }

  /// Tiles selected by the last `update`.
  #[inline]
  pub fn tiles(&self) -> &[Tile] {
    &self.tiles
  }

  /// Instance batch of the current frame slot.
  #[inline]
  pub fn current_instances(&self) -> &InstanceBatch {
    &self.frames.current().value
  }

  /// Fence to wait on before the next `update` reuses its slot.
  #[inline]
  pub fn pending_fence(&self) -> u64 {
    self.frames.pending_fence()
  }

  /// Run selection for one frame and fill the next frame slot.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "terrain::update"))]
  pub fn update(&mut self, view: &ViewState, frustum: &Frustum) -> FrameReport {
    let start = Instant::now();
    let stats = self.selector.select_tiles(view, frustum, &mut self.tiles);
    let elapsed_us = start.elapsed().as_micros() as u64;

    let counts = LevelCounts::from_tiles(&self.tiles);
    let slot = self.frames.begin_frame();
    slot.value.fill(&self.tiles);
    let instances = slot.value.len();
    let dropped = slot.value.dropped();

    self.metrics.record_frame(&counts, &stats, dropped);
    self.metrics.record_selection_timing(elapsed_us);

    let band_level = match &self.selector {
      ActiveSelector::Banded(banded) => banded.uniform_level(),
      ActiveSelector::Recursive(_) => None,
    };

    tracing::trace!(
      frame = self.frames.frame(),
      %counts,
      instances,
      culled = stats.culled,
      elapsed_us,
      "terrain frame"
    );

    FrameReport {
      frame: self.frames.frame(),
      slot: self.frames.current_index(),
      counts,
      stats,
      instances,
      dropped,
      band_level,
    }
  }

  /// Hand the current slot's instances to `renderer`.
  pub fn render<R: TerrainRenderer + ?Sized>(&self, renderer: &mut R) {
    renderer.draw_instanced(self.frames.current_index(), self.current_instances().records());
  }
}

#[cfg(test)]
#[path = "terrain_test.rs"]
mod terrain_test;
