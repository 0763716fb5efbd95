//! Frame-indexed slots rotated round-robin across frames in flight.
//!
//! A slot written for frame `n` may still be read by the GPU while frames
//! `n + 1 .. n + len - 1` are prepared. Each slot remembers the fence value
//! of the frame that last used it; the caller waits on that fence before
//! calling [`FrameRing::begin_frame`] again for the same slot.
//!
//! ```text
//! frame:  0  1  2  3  4  5
//! slot:   0  1  2  0  1  2
//! ```

/// One frame's slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSlot<T> {
  pub value: T,
  /// Fence value of the frame that last wrote this slot (0 = never used).
  pub fence: u64,
}

/// Fixed ring of per-frame values.
#[derive(Clone, Debug)]
pub struct FrameRing<T> {
  slots: Vec<FrameSlot<T>>,
  current: usize,
  frame: u64,
}

impl<T> FrameRing<T> {
  /// Ring of `len` slots, each initialized by `init`. `len` must be at
  /// least one.
  pub fn new(len: usize, mut init: impl FnMut() -> T) -> Self {
    debug_assert!(len > 0, "frame ring needs at least one slot");
    Self {
      slots: (0..len.max(1))
        .map(|_| FrameSlot {
          value: init(),
          fence: 0,
        })
        .collect(),
      current: 0,
      frame: 0,
    }
  }

  /// Number of slots.
  #[inline]
  pub fn len(&self) -> usize {
    self.slots.len()
  }

  /// Always false.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  /// Frames started so far.
  #[inline]
  pub fn frame(&self) -> u64 {
    self.frame
  }

  /// Index of the slot for the current frame.
  #[inline]
  pub fn current_index(&self) -> usize {
    self.current
  }

  /// Fence the caller must wait on before the next `begin_frame`.
  ///
  /// This is the fence stamped on the slot that will be reused next.
  pub fn pending_fence(&self) -> u64 {
    self.slots[(self.current + 1) % self.slots.len()].fence
  }

  /// Advance to the next slot and stamp it with the new frame number.
  ///
  /// Returns the slot for writing. The first call uses slot 0.
  pub fn begin_frame(&mut self) -> &mut FrameSlot<T> {
    if self.frame > 0 {
      self.current = (self.current + 1) % self.slots.len();
    }
    self.frame += 1;
    let slot = &mut self.slots[self.current];
    slot.fence = self.frame;
    slot
  }

  /// Slot of the current frame.
  #[inline]
  pub fn current(&self) -> &FrameSlot<T> {
    &self.slots[self.current]
  }

  #[inline]
  pub fn current_mut(&mut self) -> &mut FrameSlot<T> {
    &mut self.slots[self.current]
  }

  /// All slots in index order.
  pub fn iter(&self) -> impl Iterator<Item = &FrameSlot<T>> {
    self.slots.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_round_robin() {
    let mut ring = FrameRing::new(3, || 0u32);
    let mut order = Vec::new();
    for _ in 0..7 {
      ring.begin_frame();
      order.push(ring.current_index());
    }
    assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(ring.frame(), 7);
  }

  /// Each slot carries the fence of the frame that last wrote it.
  #[test]
  fn test_fences() {
    let mut ring = FrameRing::new(3, Vec::<u8>::new);
    assert_eq!(ring.pending_fence(), 0);

    for frame in 1..=4u64 {
      let slot = ring.begin_frame();
      slot.value.push(frame as u8);
      assert_eq!(slot.fence, frame);
    }
    // Slot 0 was rewritten by frame 4; slot 1 is next and last used by 2.
    assert_eq!(ring.current().fence, 4);
    assert_eq!(ring.pending_fence(), 2);

    let fences: Vec<u64> = ring.iter().map(|s| s.fence).collect();
    assert_eq!(fences, vec![4, 2, 3]);
    assert_eq!(ring.current().value, vec![1, 4]);
  }

  /// A single slot is reused every frame.
  #[test]
  fn test_single_slot() {
    let mut ring = FrameRing::new(1, || 'x');
    ring.begin_frame();
    ring.begin_frame();
    assert_eq!(ring.current_index(), 0);
    assert_eq!(ring.pending_fence(), 2);
    ring.current_mut().value = 'y';
    assert_eq!(ring.current().value, 'y');
    assert_eq!(ring.len(), 1);
  }
}
