//! InstanceDataBuilder - flattens selected tiles into GPU instance records.
//!
//! Each tile becomes one fixed-layout [`InstanceRecord`]. The batch has a
//! fixed capacity: extra tiles are dropped in order and counted, so the
//! caller can detect overflow without it ever being an error.

use crate::selection::Tile;

/// Per-instance data consumed by the instanced terrain draw.
///
/// `#[repr(C)]` with only 4-byte fields, 96 bytes, no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InstanceRecord {
  /// Column-major unit-square-to-world transform.
  pub transform: [[f32; 4]; 4],
  pub atlas_offset: [f32; 2],
  pub atlas_scale: [f32; 2],
  pub level: u32,
  pub height_texture: u32,
  pub color_texture: u32,
  pub normal_texture: u32,
}

impl InstanceRecord {
  /// Size of one record in bytes.
  pub const SIZE: usize = std::mem::size_of::<Self>();
}

impl From<&Tile> for InstanceRecord {
  fn from(tile: &Tile) -> Self {
    Self {
      transform: tile.world_transform.to_cols_array_2d(),
      atlas_offset: tile.atlas.offset.to_array(),
      atlas_scale: tile.atlas.scale.to_array(),
      level: tile.level as u32,
      height_texture: tile.height_texture_index,
      color_texture: tile.color_texture_index,
      normal_texture: tile.normal_texture_index,
    }
  }
}

/// Capacity-bounded sequence of instance records for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceBatch {
  records: Vec<InstanceRecord>,
  capacity: usize,
  dropped: usize,
}

impl InstanceBatch {
  /// Empty batch holding at most `capacity` records.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      records: Vec::with_capacity(capacity),
      capacity,
      dropped: 0,
    }
  }

  /// Replace the contents with records for `tiles`.
  ///
  /// Keeps the first `capacity` tiles in order and counts the rest as
  /// dropped.
  pub fn fill(&mut self, tiles: &[Tile]) {
    self.records.clear();
    let kept = tiles.len().min(self.capacity);
    self.records.extend(tiles[..kept].iter().map(InstanceRecord::from));
    self.dropped = tiles.len() - kept;

    if self.dropped > 0 {
      tracing::warn!(
        capacity = self.capacity,
        selected = tiles.len(),
        dropped = self.dropped,
        "instance buffer overflow, truncating"
      );
    }
  }

  /// Remove all records.
  pub fn clear(&mut self) {
    self.records.clear();
    self.dropped = 0;
  }

  #[inline]
  pub fn records(&self) -> &[InstanceRecord] {
    &self.records
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.records.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Tiles that did not fit in the last fill.
  #[inline]
  pub fn dropped(&self) -> usize {
    self.dropped
  }

  /// Whether the last fill truncated.
  #[inline]
  pub fn overflowed(&self) -> bool {
    self.dropped > 0
  }

  /// Size of the filled records in bytes.
  #[inline]
  pub fn byte_len(&self) -> usize {
    self.records.len() * InstanceRecord::SIZE
  }
}

/// Build a fresh batch for `tiles`.
pub fn build_instances(tiles: &[Tile], capacity: usize) -> InstanceBatch {
  let mut batch = InstanceBatch::with_capacity(capacity);
  batch.fill(tiles);
  batch
}

#[cfg(test)]
mod tests {
  use glam::{Mat4, Vec2, Vec4};

  use super::*;
  use crate::quadtree::TileBounds;
  use crate::selection::AtlasRegion;

  fn tiles(count: u32) -> Vec<Tile> {
    (0..count)
      .map(|i| {
        Tile::new(
          2,
          i % 4,
          i / 4,
          &TileBounds::from_min_size(i as f32 * 10.0, 0.0, 10.0),
          5 + i,
          AtlasRegion::FULL,
        )
      })
      .collect()
  }

  #[test]
  fn test_record_layout() {
    assert_eq!(InstanceRecord::SIZE, 96);
    assert_eq!(std::mem::align_of::<InstanceRecord>(), 4);
  }

  /// Transform, level, textures and atlas all carry over.
  #[test]
  fn test_record_from_tile() {
    let tile = Tile::new(
      1,
      1,
      0,
      &TileBounds::from_min_size(0.0, -256.0, 128.0),
      2,
      AtlasRegion::for_cell(1, 3, 0),
    );
    let record = InstanceRecord::from(&tile);

    assert_eq!(record.level, 1);
    assert_eq!(record.height_texture, 2);
    assert_eq!(record.color_texture, 2);
    assert_eq!(record.normal_texture, 2);
    assert_eq!(record.atlas_offset, [0.5, 0.0]);
    assert_eq!(record.atlas_scale, [0.5, 0.5]);

    let transform = Mat4::from_cols_array_2d(&record.transform);
    assert_eq!(transform, tile.world_transform);
    // Translation lives in the last column.
    assert_eq!(transform.w_axis, Vec4::new(0.0, 0.0, -256.0, 1.0));
    assert_eq!(transform.x_axis.x, 128.0);
    assert_eq!(transform.y_axis.y, 1.0);
  }

  #[test]
  fn test_within_capacity() {
    let batch = build_instances(&tiles(16), 64);
    assert_eq!(batch.len(), 16);
    assert!(!batch.overflowed());
    assert_eq!(batch.dropped(), 0);
    assert_eq!(batch.byte_len(), 16 * 96);
  }

  /// Overflow keeps the first `capacity` tiles in order.
  #[test]
  fn test_overflow_truncates_in_order() {
    let input = tiles(10);
    let batch = build_instances(&input, 4);

    assert_eq!(batch.len(), 4);
    assert!(batch.overflowed());
    assert_eq!(batch.dropped(), 6);
    let textures: Vec<u32> = batch.records().iter().map(|r| r.height_texture).collect();
    assert_eq!(textures, vec![5, 6, 7, 8]);
  }

  /// Exactly at capacity is not an overflow.
  #[test]
  fn test_exact_capacity() {
    let batch = build_instances(&tiles(4), 4);
    assert_eq!(batch.len(), 4);
    assert!(!batch.overflowed());
  }

  /// Refilling replaces the previous frame's records and overflow flag.
  #[test]
  fn test_refill_resets() {
    let mut batch = build_instances(&tiles(8), 4);
    assert!(batch.overflowed());

    batch.fill(&tiles(2));
    assert_eq!(batch.len(), 2);
    assert!(!batch.overflowed());

    batch.fill(&[]);
    assert!(batch.is_empty());
    assert_eq!(batch.capacity(), 4);
  }

  #[test]
  fn test_sub_region_preserved() {
    let tile = Tile::new(
      0,
      0,
      0,
      &TileBounds::from_min_size(-256.0, 128.0, 128.0),
      0,
      AtlasRegion::for_cell(0, 0, 3),
    );
    let record = InstanceRecord::from(&tile);
    assert_eq!(Vec2::from_array(record.atlas_offset), Vec2::new(0.0, 0.75));
    assert_eq!(Vec2::from_array(record.atlas_scale), Vec2::splat(0.25));
  }
}
