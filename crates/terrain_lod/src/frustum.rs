//! View frustum and bounding-volume visibility tests.
//!
//! The test is conservative: a box is visible unless it lies entirely on
//! the outside of at least one plane. Full and partial containment are not
//! distinguished.

use glam::{Mat4, Vec3, Vec4};

use crate::config::TerrainConfig;
use crate::quadtree::TileBounds;

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb3 {
  /// Create a new AABB from min and max corners.
  pub fn new(min: Vec3, max: Vec3) -> Self {
    debug_assert!(
      min.cmple(max).all(),
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a new AABB from center and half-extents.
  pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
    Self {
      min: center - half_extents,
      max: center + half_extents,
    }
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.min + self.max) * 0.5
  }

  /// Get the half-extents of the AABB.
  #[inline]
  pub fn half_extents(&self) -> Vec3 {
    (self.max - self.min) * 0.5
  }
}

/// A plane `normal · p + d = 0`. Points with positive signed distance are
/// on the inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: Vec3,
  pub d: f32,
}

impl Plane {
  /// Plane from a (not necessarily unit) normal and offset. Normalized so
  /// signed distances are in world units.
  pub fn new(normal: Vec3, d: f32) -> Self {
    let length = normal.length();
    if length > 0.0 {
      Self {
        normal: normal / length,
        d: d / length,
      }
    } else {
      Self {
        normal: Vec3::ZERO,
        d: 0.0,
      }
    }
  }

  /// Plane through `point` facing along `normal`.
  pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
    let n = normal.normalize_or_zero();
    Self {
      normal: n,
      d: -n.dot(point),
    }
  }

  fn from_vec4(v: Vec4) -> Self {
    Self::new(v.truncate(), v.w)
  }

  /// Signed distance from the plane to `point`.
  #[inline]
  pub fn signed_distance(&self, point: Vec3) -> f32 {
    self.normal.dot(point) + self.d
  }
}

/// Six-plane view frustum in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
  /// Left, right, bottom, top, near, far.
  planes: [Plane; 6],
}

impl Frustum {
  /// Frustum from six inward-facing planes.
  pub fn from_planes(planes: [Plane; 6]) -> Self {
    Self { planes }
  }

  /// Extract planes from a view-projection matrix with a [0, 1] clip depth
  /// range (`Mat4::perspective_rh` and friends).
  pub fn from_view_projection(view_projection: Mat4) -> Self {
    let r0 = view_projection.row(0);
    let r1 = view_projection.row(1);
    let r2 = view_projection.row(2);
    let r3 = view_projection.row(3);

    Self {
      planes: [
        Plane::from_vec4(r3 + r0),
        Plane::from_vec4(r3 - r0),
        Plane::from_vec4(r3 + r1),
        Plane::from_vec4(r3 - r1),
        Plane::from_vec4(r2),
        Plane::from_vec4(r3 - r2),
      ],
    }
  }

  /// The six planes.
  #[inline]
  pub fn planes(&self) -> &[Plane; 6] {
    &self.planes
  }

  /// Whether `aabb` is not disjoint from the frustum.
  pub fn intersects_aabb(&self, aabb: &Aabb3) -> bool {
    let center = aabb.center();
    let half = aabb.half_extents();
    for plane in &self.planes {
      // Project the box onto the plane normal.
      let r = half.dot(plane.normal.abs());
      if plane.signed_distance(center) < -r {
        return false;
      }
    }
    true
  }
}

/// Tests terrain rectangles against a frustum after lifting them into the
/// terrain's vertical range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityTest {
  /// Vertical center of every culling volume.
  pub center_y: f32,
  /// Vertical half-extent of every culling volume.
  pub half_height: f32,
}

impl VisibilityTest {
  pub fn new(config: &TerrainConfig) -> Self {
    Self {
      center_y: config.culling_center_y(),
      half_height: config.culling_half_height(),
    }
  }

  /// Culling volume for `bounds`.
  #[inline]
  pub fn volume(&self, bounds: &TileBounds) -> Aabb3 {
    bounds.to_aabb(self.center_y, self.half_height)
  }

  /// Potentially visible = not disjoint.
  #[inline]
  pub fn is_visible(&self, bounds: &TileBounds, frustum: &Frustum) -> bool {
    frustum.intersects_aabb(&self.volume(bounds))
  }
}

#[cfg(test)]
#[path = "frustum_test.rs"]
mod frustum_test;
