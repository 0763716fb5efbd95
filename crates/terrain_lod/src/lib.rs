//! terrain_lod - Engine independent terrain tile LOD selection
//!
//! Once per frame, decides which tiles of a square terrain to draw and at
//! which of three detail levels, then flattens them into instance records
//! for a single instanced draw.
//!
//! # Features
//!
//! - **Screen-space error policy**: recursive quadtree traversal that
//!   subdivides while a node's projected error exceeds a pixel budget
//! - **Distance-band policy**: flat 4x4 grid with asymmetric thresholds and
//!   a cooldown, in uniform or per-cell ring mode
//! - **Frustum culling**: conservative AABB vs six-plane test
//! - **Texture atlasing**: coarse textures shared by several cells are
//!   addressed through UV sub-regions
//! - **Bounded output**: fixed-capacity instance batches with an overflow
//!   count, rotated across frames in flight
//!
//! # Example
//!
//! ```ignore
//! use terrain_lod::{Frustum, SelectionPolicy, TerrainConfig, TerrainLod, ViewState};
//!
//! let mut lod = TerrainLod::new(TerrainConfig::default(), SelectionPolicy::ScreenSpaceError)?;
//!
//! // Every frame:
//! let frustum = Frustum::from_view_projection(projection * view);
//! let report = lod.update(&ViewState::new(camera_pos, dt), &frustum);
//! lod.render(&mut renderer);
//! println!("{} ({} dropped)", report.counts, report.dropped);
//! ```

pub mod config;
pub mod constants;
pub mod error;

pub use config::{BandMode, BandThresholds, BandedConfig, SelectionPolicy, TerrainConfig};
pub use constants::{texture_index, GRID_SIZE, MAX_LEVEL, TOTAL_TEXTURE_SETS};
pub use error::{ConfigError, Result};

// Fixed three-level quadtree
pub mod quadtree;
pub use quadtree::{NodeId, QuadNode, Quadrant, SpatialHierarchy, TileBounds};

// Visibility and error metrics
pub mod error_metric;
pub mod frustum;
pub use error_metric::ScreenSpaceErrorEstimator;
pub use frustum::{Aabb3, Frustum, Plane, VisibilityTest};

// Selection policies
pub mod selection;
pub use selection::{
  AtlasRegion, BandState, BandedSelector, HysteresisState, LevelCounts, RecursiveSelector, SelectionStats, Tile,
  TileSelector, ViewState,
};

// Instance building and frame slots
pub mod frame;
pub mod instance;
pub use frame::{FrameRing, FrameSlot};
pub use instance::{build_instances, InstanceBatch, InstanceRecord};

// Engine-facing pipeline
pub mod metrics;
pub mod renderer;
pub mod terrain;
pub use renderer::{NullRenderer, TerrainRenderer};
pub use terrain::{ActiveSelector, FrameReport, TerrainLod};

#[cfg(test)]
pub mod test_utils;
