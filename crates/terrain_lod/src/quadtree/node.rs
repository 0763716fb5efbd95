//! QuadNode - one node of the terrain tile hierarchy.
//!
//! Nodes are identified by their grid coordinates at their own level.
//! Level 0 = coarsest (the root), higher level = finer.

use super::TileBounds;
use crate::constants::{texture_index, MAX_LEVEL};

/// Index of a node inside its [`super::SpatialHierarchy`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  /// Get the raw arena index.
  #[inline]
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

/// Child slot within a parent, in storage order.
///
/// South = -Z, west = -X.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Quadrant {
  SouthWest = 0,
  SouthEast = 1,
  NorthWest = 2,
  NorthEast = 3,
}

impl Quadrant {
  /// All quadrants in child storage order.
  pub const ALL: [Quadrant; 4] = [
    Quadrant::SouthWest,
    Quadrant::SouthEast,
    Quadrant::NorthWest,
    Quadrant::NorthEast,
  ];

  /// Grid offset (dx, dz) of this quadrant within its parent: bit 0 = +X,
  /// bit 1 = +Z.
  #[inline]
  pub fn offset(self) -> (u32, u32) {
    let bits = self as u32;
    (bits & 1, (bits >> 1) & 1)
  }

  /// Sub-rectangle of `parent` covered by this quadrant.
  pub fn bounds_within(self, parent: &TileBounds) -> TileBounds {
    let center = parent.center();
    let (dx, dz) = self.offset();
    let (min_x, max_x) = if dx == 0 {
      (parent.min_x, center.x)
    } else {
      (center.x, parent.max_x)
    };
    let (min_z, max_z) = if dz == 0 {
      (parent.min_z, center.y)
    } else {
      (center.y, parent.max_z)
    };
    TileBounds::new(min_x, min_z, max_x, max_z)
  }
}

/// Terrain quadtree node.
///
/// Children are present iff `level < MAX_LEVEL`; their bounds partition the
/// parent's bounds into four equal quadrants.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadNode {
  /// Detail level (0 = coarsest).
  pub level: u8,
  /// Grid X position at this node's level.
  pub grid_x: u32,
  /// Grid Z position at this node's level.
  pub grid_z: u32,
  /// World-space footprint.
  pub bounds: TileBounds,
  /// Texture set index, a pure function of (level, grid_x, grid_z).
  pub texture_index: u32,
  /// Child ids in [`Quadrant::ALL`] order.
  pub(crate) children: Option<[NodeId; 4]>,
}

impl QuadNode {
  pub(crate) fn new(level: u8, grid_x: u32, grid_z: u32, bounds: TileBounds) -> Self {
    Self {
      level,
      grid_x,
      grid_z,
      bounds,
      texture_index: texture_index(level, grid_x, grid_z),
      children: None,
    }
  }

  /// Whether this node subdivides further.
  #[inline]
  pub fn has_children(&self) -> bool {
    self.children.is_some()
  }

  /// Whether this node sits at the finest level.
  #[inline]
  pub fn is_finest(&self) -> bool {
    self.level >= MAX_LEVEL
  }

  /// Child ids in SW, SE, NW, NE order.
  #[inline]
  pub fn children(&self) -> Option<&[NodeId; 4]> {
    self.children.as_ref()
  }

  /// Grid coordinates of the child in `quadrant` (finer: level + 1).
  ///
  /// Returns None at the finest level.
  pub fn child_coords(&self, quadrant: Quadrant) -> Option<(u8, u32, u32)> {
    if self.is_finest() {
      return None;
    }
    let (dx, dz) = quadrant.offset();
    Some((self.level + 1, self.grid_x * 2 + dx, self.grid_z * 2 + dz))
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
