use super::*;
use crate::constants::MAX_LEVEL;
use crate::selection::LevelCounts;
use crate::test_utils::{
  assert_no_overlap, box_frustum, camera_frustum, covered_area, reference_config, see_everything, x_slab,
};

fn selector(config: &TerrainConfig) -> RecursiveSelector {
  RecursiveSelector::new(config).expect("valid config")
}

fn select(config: &TerrainConfig, viewer: Vec3, frustum: &Frustum) -> (Vec<Tile>, SelectionStats) {
  let mut tiles = Vec::new();
  let stats = selector(config).select_tiles(&ViewState::at(viewer), frustum, &mut tiles);
  (tiles, stats)
}

// =========================================================================
// Distance behaviour
// =========================================================================

/// Viewer in the middle of the terrain: every node is over budget, so all
/// 16 finest tiles are drawn.
#[test]
fn test_close_viewer_selects_finest() {
  let config = reference_config();
  let (tiles, stats) = select(&config, Vec3::new(0.0, 80.0, 0.0), &see_everything());

  assert_eq!(tiles.len(), 16);
  assert!(tiles.iter().all(|t| t.level == MAX_LEVEL));
  assert_eq!(stats.subdivided, 5, "root plus four level-1 nodes");
  assert_eq!(stats.tiles_emitted, 16);
  assert_no_overlap(&tiles);
  assert_eq!(covered_area(&tiles), config.world_size * config.world_size);
}

/// Far enough away the root meets the budget and is drawn alone.
#[test]
fn test_far_viewer_selects_root() {
  let config = reference_config();
  let estimator = ScreenSpaceErrorEstimator::new(&config);
  let far = estimator.acceptable_distance(0, config.max_screen_error) * 2.0;

  let (tiles, stats) = select(&config, Vec3::new(0.0, 75.0, far), &see_everything());

  assert_eq!(tiles.len(), 1);
  assert_eq!(tiles[0].level, 0);
  assert_eq!(tiles[0].world_size, config.world_size);
  assert!(tiles[0].atlas.is_full());
  assert_eq!(stats.subdivided, 0);
}

/// Between the root and level-1 acceptance distances, the four quadrants are
/// drawn at level 1.
#[test]
fn test_mid_distance_selects_level1() {
  let config = reference_config();
  let estimator = ScreenSpaceErrorEstimator::new(&config);
  let root_limit = estimator.acceptable_distance(0, config.max_screen_error);
  let l1_limit = estimator.acceptable_distance(1, config.max_screen_error);
  let distance = (root_limit * 0.5).max(l1_limit * 1.5);

  let (tiles, _) = select(&config, Vec3::new(0.0, 75.0, distance), &see_everything());

  assert_eq!(LevelCounts::from_tiles(&tiles), LevelCounts([0, 4, 0]));
  assert_eq!(covered_area(&tiles), config.world_size * config.world_size);
}

/// With a loose budget only the quadrant under the viewer refines.
#[test]
fn test_nearest_quadrant_refines() {
  let config = TerrainConfig {
    max_screen_error: 100.0,
    ..reference_config()
  };
  let (tiles, _) = select(&config, Vec3::new(-200.0, 75.0, -200.0), &see_everything());

  assert_eq!(LevelCounts::from_tiles(&tiles), LevelCounts([0, 3, 4]));
  // The SW quadrant's four children come first.
  for tile in &tiles[..4] {
    assert_eq!(tile.level, 2);
    assert!(tile.grid_x < 2 && tile.grid_z < 2);
  }
  assert_no_overlap(&tiles);
  assert_eq!(covered_area(&tiles), config.world_size * config.world_size);
}

/// Emission follows depth-first SW, SE, NW, NE order.
#[test]
fn test_depth_first_order() {
  let config = reference_config();
  let (tiles, _) = select(&config, Vec3::new(0.0, 80.0, 0.0), &see_everything());

  let coords: Vec<(u32, u32)> = tiles.iter().take(8).map(|t| (t.grid_x, t.grid_z)).collect();
  assert_eq!(
    coords,
    vec![(0, 0), (1, 0), (0, 1), (1, 1), (2, 0), (3, 0), (2, 1), (3, 1)]
  );
  assert_eq!(tiles[0].height_texture_index, 5);
}

// =========================================================================
// Visibility
// =========================================================================

/// Nothing in view: only the root is tested.
#[test]
fn test_everything_culled() {
  let config = reference_config();
  let away = box_frustum(Vec3::splat(5000.0), Vec3::splat(6000.0));
  let (tiles, stats) = select(&config, Vec3::new(0.0, 80.0, 0.0), &away);

  assert!(tiles.is_empty());
  assert_eq!(stats.visibility_tests, 1);
  assert_eq!(stats.culled, 1);
  assert_eq!(stats.tiles_emitted, 0);
}

/// Culled quadrants prune their subtrees.
#[test]
fn test_culled_subtree_pruned() {
  let config = reference_config();
  let (tiles, stats) = select(&config, Vec3::new(0.0, 80.0, 0.0), &x_slab(-256.0, -1.0));

  assert_eq!(tiles.len(), 8);
  assert!(tiles.iter().all(|t| t.world_min_x < 0.0));
  // root + 4 quadrants + 8 children of the two western quadrants
  assert_eq!(stats.visibility_tests, 13);
  assert_eq!(stats.culled, 2);
}

/// A real camera looking away from the north-east corner never draws it.
#[test]
fn test_camera_frustum_culls_behind() {
  let config = reference_config();
  let eye = Vec3::new(-200.0, 100.0, -200.0);
  let frustum = camera_frustum(eye, Vec3::new(-1.0, -0.3, -1.0), config.fov_y, 16.0 / 9.0, 0.5, 2000.0);
  let (tiles, stats) = select(&config, eye, &frustum);

  assert!(!tiles.is_empty());
  assert!(stats.culled > 0);
  assert!(!tiles.iter().any(|t| t.world_min_x >= 128.0 && t.world_min_z >= 128.0));
  assert_no_overlap(&tiles);
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_invalid_config_rejected() {
  let config = TerrainConfig {
    world_size: -1.0,
    ..reference_config()
  };
  assert!(RecursiveSelector::new(&config).is_err());
}

/// Identical inputs give identical output.
#[test]
fn test_selection_deterministic() {
  let config = reference_config();
  let viewer = Vec3::new(37.0, 120.0, -91.0);
  let (a, _) = select(&config, viewer, &see_everything());
  let (b, _) = select(&config, viewer, &see_everything());
  assert_eq!(a, b);
}
