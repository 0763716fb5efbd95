use super::*;

fn hierarchy() -> SpatialHierarchy {
  SpatialHierarchy::build(512.0).unwrap()
}

// =========================================================================
// Construction
// =========================================================================

/// Complete three-level tree: 1 + 4 + 16 nodes.
#[test]
fn test_node_count() {
  let h = hierarchy();
  assert_eq!(h.len(), NODE_COUNT);
  assert_eq!(h.level_nodes(0).len(), 1);
  assert_eq!(h.level_nodes(1).len(), 4);
  assert_eq!(h.level_nodes(2).len(), 16);
}

/// Root covers [-size/2, size/2]² at level 0.
#[test]
fn test_root_bounds() {
  let h = hierarchy();
  let root = h.node(h.root());
  assert_eq!(root.level, 0);
  assert_eq!((root.grid_x, root.grid_z), (0, 0));
  assert_eq!(root.bounds, TileBounds::new(-256.0, -256.0, 256.0, 256.0));
}

/// Children exist exactly on non-finest levels.
#[test]
fn test_children_present_iff_not_finest() {
  let h = hierarchy();
  for (_, node) in h.iter() {
    assert_eq!(
      node.has_children(),
      node.level < MAX_LEVEL,
      "level {} node ({}, {})",
      node.level,
      node.grid_x,
      node.grid_z
    );
  }
}

/// The four children exactly partition the parent: equal quadrants,
/// no interior overlap, total area equals the parent's, all contained.
#[test]
fn test_children_partition_parent() {
  let h = hierarchy();
  for (id, parent) in h.iter() {
    let children: Vec<_> = h.children(id).map(|(_, c)| c.bounds).collect();
    if children.is_empty() {
      continue;
    }
    assert_eq!(children.len(), 4);

    let area: f32 = children.iter().map(|b| b.area()).sum();
    assert_eq!(area, parent.bounds.area(), "children area must equal parent");

    for (i, a) in children.iter().enumerate() {
      assert_eq!(a.area(), parent.bounds.area() / 4.0, "quadrants must be equal");
      assert!(parent.bounds.contains_xz(a.min_x, a.min_z));
      assert!(parent.bounds.contains_xz(a.max_x, a.max_z));
      for b in children.iter().skip(i + 1) {
        assert!(!a.overlaps_interior(b), "children {:?} and {:?} overlap", a, b);
      }
    }
  }
}

/// Child grid coordinates and levels follow the quadrant convention.
#[test]
fn test_child_grid_coordinates() {
  let h = hierarchy();
  for (id, parent) in h.iter() {
    for (quadrant, (_, child)) in Quadrant::ALL.into_iter().zip(h.children(id)) {
      let expected = parent.child_coords(quadrant).unwrap();
      assert_eq!((child.level, child.grid_x, child.grid_z), expected);
    }
  }
}

/// Grid coordinates map straight to world position.
#[test]
fn test_node_bounds_match_grid() {
  let h = hierarchy();
  for (_, node) in h.iter() {
    let size = 512.0 / tiles_per_axis(node.level) as f32;
    assert_eq!(node.bounds.min_x, -256.0 + node.grid_x as f32 * size);
    assert_eq!(node.bounds.min_z, -256.0 + node.grid_z as f32 * size);
    assert_eq!(node.bounds.width(), size);
  }
}

/// Building twice yields identical trees.
#[test]
fn test_build_is_deterministic() {
  let a = hierarchy();
  let b = hierarchy();
  let nodes_a: Vec<_> = a.iter().map(|(_, n)| n.clone()).collect();
  let nodes_b: Vec<_> = b.iter().map(|(_, n)| n.clone()).collect();
  assert_eq!(nodes_a, nodes_b);
}

#[test]
fn test_invalid_size_rejected() {
  assert_eq!(
    SpatialHierarchy::build(0.0).unwrap_err(),
    ConfigError::InvalidTerrainSize(0.0)
  );
  assert!(SpatialHierarchy::build(-1.0).is_err());
}

// =========================================================================
// Lookup
// =========================================================================

/// find() returns the node with matching coordinates at every level.
#[test]
fn test_find_every_node() {
  let h = hierarchy();
  for (id, node) in h.iter() {
    assert_eq!(h.find(node.level, node.grid_x, node.grid_z), Some(id));
  }
}

#[test]
fn test_find_out_of_range() {
  let h = hierarchy();
  assert!(h.find(3, 0, 0).is_none());
  assert!(h.find(1, 2, 0).is_none());
  assert!(h.find(2, 0, 4).is_none());
}

/// Finest-level texture indices cover 5..=20.
#[test]
fn test_finest_texture_indices() {
  let h = hierarchy();
  let mut indices: Vec<u32> = h
    .level_nodes(2)
    .iter()
    .map(|id| h.node(*id).texture_index)
    .collect();
  indices.sort_unstable();
  assert_eq!(indices, (5..=20).collect::<Vec<_>>());
}
