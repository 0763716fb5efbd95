//! TerrainRenderer - the seam between tile selection and a graphics backend.
//!
//! The core never touches GPU objects. A backend receives the instance
//! records for one frame slot and issues a single instanced draw of the
//! unit terrain mesh, indexing the records by instance ordinal.

use crate::instance::InstanceRecord;

/// Consumer of per-frame instance data.
///
/// # Example
///
/// ```ignore
/// struct WgpuTerrain {
///     instance_buffers: Vec<wgpu::Buffer>, // one per frame slot
/// }
///
/// impl TerrainRenderer for WgpuTerrain {
///     fn draw_instanced(&mut self, slot: usize, instances: &[InstanceRecord]) {
///         self.queue.write_buffer(&self.instance_buffers[slot], 0, as_bytes(instances));
///         // pass.draw_indexed(0..index_count, 0, 0..instances.len() as u32)
///     }
/// }
/// ```
pub trait TerrainRenderer {
  /// Upload `instances` into frame slot `slot` and draw them in one call.
  ///
  /// Called once per frame, possibly with an empty slice.
  fn draw_instanced(&mut self, slot: usize, instances: &[InstanceRecord]);
}

/// Renderer that discards everything, for headless runs.
pub struct NullRenderer;

impl TerrainRenderer for NullRenderer {
  fn draw_instanced(&mut self, _slot: usize, _instances: &[InstanceRecord]) {
    // No-op
  }
}

/// Renderer that records what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
  /// `(slot, instance count)` per call.
  pub draws: Vec<(usize, usize)>,
  /// Copy of the most recent instances.
  pub last: Vec<InstanceRecord>,
}

impl TerrainRenderer for RecordingRenderer {
  fn draw_instanced(&mut self, slot: usize, instances: &[InstanceRecord]) {
    self.draws.push((slot, instances.len()));
    self.last.clear();
    self.last.extend_from_slice(instances);
  }
}
