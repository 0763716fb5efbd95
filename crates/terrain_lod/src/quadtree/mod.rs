//! Quadtree module for the terrain tile hierarchy.
//!
//! Unlike an implicit leaf-set tree, the terrain hierarchy is small and
//! fixed (three levels, 21 nodes), so it is built explicitly once and
//! shared read-only by the selectors.
//!
//! # Level Convention
//!
//! Level 0 = coarsest (root), level 2 = finest.
//!
//! ```text
//! Tile Size = world_size / 2^level
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `TileBounds` - XZ rectangles and distance helpers
//! - [`node`]: `QuadNode`, `Quadrant`, `NodeId`
//! - [`hierarchy`]: `SpatialHierarchy` - arena-backed fixed quadtree

pub mod bounds;
pub mod hierarchy;
pub mod node;

// Re-exports
pub use bounds::TileBounds;
pub use hierarchy::{SpatialHierarchy, NODE_COUNT};
pub use node::{NodeId, QuadNode, Quadrant};
