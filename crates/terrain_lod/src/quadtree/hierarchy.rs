//! SpatialHierarchy - the fixed three-level quadtree over the terrain.
//!
//! Built once at startup and read-only afterwards. Nodes are stored in an
//! arena and addressed by [`NodeId`]; each parent holds its children's ids,
//! so there is no shared or cyclic ownership.
//!
//! ```text
//! arena: [root, SW, SW.SW, SW.SE, SW.NW, SW.NE, SE, SE.SW, ...]
//!         └─ depth-first pre-order, children in SW, SE, NW, NE order
//! ```

use smallvec::SmallVec;

use super::{NodeId, QuadNode, Quadrant, TileBounds};
use crate::constants::{tiles_per_axis, MAX_LEVEL};
use crate::error::{ConfigError, Result};

/// Total nodes in a complete three-level quadtree (1 + 4 + 16).
pub const NODE_COUNT: usize = 21;

/// Fixed-depth quadtree over a square terrain centered on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialHierarchy {
  nodes: Vec<QuadNode>,
  world_size: f32,
}

impl SpatialHierarchy {
  /// Build the hierarchy for a terrain of side `world_size`.
  ///
  /// The root covers `[-size/2, +size/2]²`. Deterministic: equal sizes
  /// produce identical trees.
  pub fn build(world_size: f32) -> Result<Self> {
    if !(world_size.is_finite() && world_size > 0.0) {
      return Err(ConfigError::InvalidTerrainSize(world_size));
    }

    let mut nodes = Vec::with_capacity(NODE_COUNT);
    build_node(&mut nodes, 0, 0, 0, TileBounds::centered_square(world_size));

    tracing::debug!(nodes = nodes.len(), world_size, "built terrain quadtree");

    Ok(Self { nodes, world_size })
  }

  /// Terrain side length this hierarchy was built for.
  #[inline]
  pub fn world_size(&self) -> f32 {
    self.world_size
  }

  /// Root node id (always the first arena slot).
  #[inline]
  pub fn root(&self) -> NodeId {
    NodeId(0)
  }

  /// Get a node by id.
  #[inline]
  pub fn node(&self, id: NodeId) -> &QuadNode {
    &self.nodes[id.index()]
  }

  /// Number of nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Never true for a built hierarchy.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Children of `id` in SW, SE, NW, NE order (empty for finest nodes).
  pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &QuadNode)> + '_ {
    self
      .node(id)
      .children()
      .into_iter()
      .flatten()
      .map(move |child| (*child, self.node(*child)))
  }

  /// Look up the node at `(level, grid_x, grid_z)`.
  ///
  /// Walks down from the root, picking the quadrant containing the target
  /// at each level.
  pub fn find(&self, level: u8, grid_x: u32, grid_z: u32) -> Option<NodeId> {
    if level > MAX_LEVEL || grid_x >= tiles_per_axis(level) || grid_z >= tiles_per_axis(level) {
      return None;
    }
    let mut id = self.root();
    for depth in 1..=level {
      let shift = level - depth;
      let dx = (grid_x >> shift) & 1;
      let dz = (grid_z >> shift) & 1;
      let children = self.node(id).children()?;
      id = children[(dz * 2 + dx) as usize];
    }
    Some(id)
  }

  /// All nodes in depth-first pre-order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &QuadNode)> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .map(|(i, node)| (NodeId(i as u32), node))
  }

  /// Nodes at one level, in depth-first order.
  pub fn level_nodes(&self, level: u8) -> SmallVec<[NodeId; 16]> {
    self
      .iter()
      .filter(|(_, node)| node.level == level)
      .map(|(id, _)| id)
      .collect()
  }
}

/// Push `node` and its subtree in pre-order. Returns the node's id.
fn build_node(
  nodes: &mut Vec<QuadNode>,
  level: u8,
  grid_x: u32,
  grid_z: u32,
  bounds: TileBounds,
) -> NodeId {
  let id = NodeId(nodes.len() as u32);
  nodes.push(QuadNode::new(level, grid_x, grid_z, bounds));

  if level < MAX_LEVEL {
    let mut children = [id; 4];
    for quadrant in Quadrant::ALL {
      let Some((child_level, child_x, child_z)) = nodes[id.index()].child_coords(quadrant) else {
        continue;
      };
      children[quadrant as usize] = build_node(
        nodes,
        child_level,
        child_x,
        child_z,
        quadrant.bounds_within(&bounds),
      );
    }
    nodes[id.index()].children = Some(children);
  }

  id
}

#[cfg(test)]
#[path = "hierarchy_test.rs"]
mod hierarchy_test;
