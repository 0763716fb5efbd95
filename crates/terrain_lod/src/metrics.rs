//! Engine-agnostic metrics for tile selection.
//!
//! Feature-gated and runtime-toggled: without the `metrics` feature every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use terrain_lod::metrics::{SelectionMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! metrics.record_frame(&counts, &stats, batch.dropped());
//! metrics.record_selection_timing(elapsed_us);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::constants::LEVEL_COUNT;
use crate::selection::{LevelCounts, SelectionStats};

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Whether metrics are collected (compile-time feature and runtime toggle).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity history, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a value, evicting the oldest when full.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Values from oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  /// Most recent value.
  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  /// Mean of the window, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds at 60fps
  }
}

/// Selection statistics accumulated across frames.
#[derive(Debug, Clone, Default)]
pub struct SelectionMetrics {
  // Last frame
  /// Tiles drawn at each level in the last frame (index = level).
  pub tiles_per_level: [u32; LEVEL_COUNT],
  /// Visibility tests rejected in the last frame.
  pub culled: u32,
  /// Instances written in the last frame.
  pub instances: u32,

  // Cumulative
  /// Frames recorded.
  pub frames: u64,
  /// Tiles dropped for lack of instance capacity.
  pub dropped_instances: u64,
  /// Frames that overflowed the instance capacity.
  pub overflow_frames: u64,
  /// Banded level transitions applied.
  pub level_changes: u64,

  // Timing
  /// Selection time per frame in microseconds.
  pub selection_timings: RollingWindow<u64>,
  pub last_selection_us: u64,
}

impl SelectionMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset everything except cumulative counters.
  pub fn reset(&mut self) {
    self.tiles_per_level.fill(0);
    self.culled = 0;
    self.instances = 0;
    self.selection_timings.clear();
    self.last_selection_us = 0;
  }

  /// Record one frame's selection outcome.
  pub fn record_frame(&mut self, counts: &LevelCounts, stats: &SelectionStats, dropped: usize) {
    if !is_enabled() {
      return;
    }
    for (slot, count) in self.tiles_per_level.iter_mut().zip(counts.0) {
      *slot = count as u32;
    }
    self.culled = stats.culled as u32;
    self.instances = (counts.total() - dropped.min(counts.total())) as u32;
    self.frames += 1;
    self.dropped_instances += dropped as u64;
    if dropped > 0 {
      self.overflow_frames += 1;
    }
    self.level_changes += stats.level_changes as u64;
  }

  pub fn record_selection_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.selection_timings.push(timing_us);
      self.last_selection_us = timing_us;
    }
  }

  /// Tiles drawn in the last frame.
  pub fn total_tiles(&self) -> u32 {
    self.tiles_per_level.iter().sum()
  }

  pub fn avg_selection_timing_us(&self) -> f64 {
    self.selection_timings.average()
  }
}
