//! Recursive screen-space error selection over the quadtree.
//!
//! Depth-first from the root, children in SW, SE, NW, NE order:
//!
//! 1. Invisible node: prune the subtree.
//! 2. Node with children whose projected error exceeds the budget: recurse.
//! 3. Otherwise: emit the node as a tile sampling its whole texture.
//!
//! Emitted tiles never overlap (a node is emitted or its subtree is
//! visited, never both) and tile the visible part of the terrain.

use glam::Vec3;

use super::{AtlasRegion, SelectionStats, Tile, TileSelector, ViewState};
use crate::config::TerrainConfig;
use crate::error::Result;
use crate::error_metric::ScreenSpaceErrorEstimator;
use crate::frustum::{Frustum, VisibilityTest};
use crate::quadtree::{NodeId, SpatialHierarchy};

/// Everything one recursive selection needs.
pub struct RecursiveInput<'a> {
  pub hierarchy: &'a SpatialHierarchy,
  pub estimator: &'a ScreenSpaceErrorEstimator,
  pub visibility: &'a VisibilityTest,
  /// Pixel budget. Nodes strictly above it subdivide.
  pub max_screen_error: f32,
  pub viewer: Vec3,
  pub frustum: &'a Frustum,
}

/// Clear `out` and fill it with the selected tiles in depth-first order.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "selection::recursive"))]
pub fn select_recursive(input: &RecursiveInput<'_>, out: &mut Vec<Tile>) -> SelectionStats {
  out.clear();
  let mut stats = SelectionStats::default();
  visit(input, input.hierarchy.root(), out, &mut stats);
  stats.tiles_emitted = out.len();
  stats
}

fn visit(input: &RecursiveInput<'_>, id: NodeId, out: &mut Vec<Tile>, stats: &mut SelectionStats) {
  let node = input.hierarchy.node(id);

  stats.visibility_tests += 1;
  if !input.visibility.is_visible(&node.bounds, input.frustum) {
    stats.culled += 1;
    return;
  }

  if let Some(children) = node.children() {
    let error = input.estimator.node_error(node.level, &node.bounds, input.viewer);
    if error > input.max_screen_error {
      stats.subdivided += 1;
      for child in *children {
        visit(input, child, out, stats);
      }
      return;
    }
  }

  out.push(Tile::new(
    node.level,
    node.grid_x,
    node.grid_z,
    &node.bounds,
    node.texture_index,
    AtlasRegion::FULL,
  ));
}

/// Stateless selector owning the hierarchy and per-config derived values.
#[derive(Clone, Debug)]
pub struct RecursiveSelector {
  hierarchy: SpatialHierarchy,
  estimator: ScreenSpaceErrorEstimator,
  visibility: VisibilityTest,
  max_screen_error: f32,
}

impl RecursiveSelector {
  pub fn new(config: &TerrainConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      hierarchy: SpatialHierarchy::build(config.world_size)?,
      estimator: ScreenSpaceErrorEstimator::new(config),
      visibility: VisibilityTest::new(config),
      max_screen_error: config.max_screen_error,
    })
  }

  #[inline]
  pub fn hierarchy(&self) -> &SpatialHierarchy {
    &self.hierarchy
  }

  #[inline]
  pub fn estimator(&self) -> &ScreenSpaceErrorEstimator {
    &self.estimator
  }
}

impl TileSelector for RecursiveSelector {
  fn name(&self) -> &'static str {
    "screen-space-error"
  }

  fn select_tiles(&mut self, view: &ViewState, frustum: &Frustum, out: &mut Vec<Tile>) -> SelectionStats {
    select_recursive(
      &RecursiveInput {
        hierarchy: &self.hierarchy,
        estimator: &self.estimator,
        visibility: &self.visibility,
        max_screen_error: self.max_screen_error,
        viewer: view.position,
        frustum,
      },
      out,
    )
  }
}

#[cfg(test)]
#[path = "recursive_test.rs"]
mod recursive_test;
