//! Axis-aligned rectangles on the terrain's XZ plane.

use glam::{Vec2, Vec3};

use crate::frustum::Aabb3;

/// Axis-aligned rectangle in world XZ.
///
/// Used for quadtree node footprints and banded-grid cells. Lifted into a
/// 3D [`Aabb3`] with the terrain's height range for visibility tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileBounds {
	pub min_x: f32,
	pub min_z: f32,
	pub max_x: f32,
	pub max_z: f32,
}

impl TileBounds {
	/// Create bounds from corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on both axes.
	pub fn new(min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Self {
		debug_assert!(
			min_x <= max_x && min_z <= max_z,
			"TileBounds min must be <= max on both axes"
		);
		Self {
			min_x,
			min_z,
			max_x,
			max_z,
		}
	}

	/// Square bounds from a min corner and side length.
	pub fn from_min_size(min_x: f32, min_z: f32, size: f32) -> Self {
		Self::new(min_x, min_z, min_x + size, min_z + size)
	}

	/// Square bounds centered on the origin.
	pub fn centered_square(size: f32) -> Self {
		let half = size * 0.5;
		Self::new(-half, -half, half, half)
	}

	/// Width along X.
	#[inline]
	pub fn width(&self) -> f32 {
		self.max_x - self.min_x
	}

	/// Depth along Z.
	#[inline]
	pub fn depth(&self) -> f32 {
		self.max_z - self.min_z
	}

	/// Center point (x, z).
	#[inline]
	pub fn center(&self) -> Vec2 {
		Vec2::new(
			(self.min_x + self.max_x) * 0.5,
			(self.min_z + self.max_z) * 0.5,
		)
	}

	/// Area in square world units.
	#[inline]
	pub fn area(&self) -> f32 {
		self.width() * self.depth()
	}

	/// Whether `(x, z)` lies inside or on the boundary.
	#[inline]
	pub fn contains_xz(&self, x: f32, z: f32) -> bool {
		x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
	}

	/// Whether the interiors of two rectangles intersect.
	///
	/// Rectangles that only share an edge do not overlap.
	#[inline]
	pub fn overlaps_interior(&self, other: &TileBounds) -> bool {
		self.min_x < other.max_x
			&& self.max_x > other.min_x
			&& self.min_z < other.max_z
			&& self.max_z > other.min_z
	}

	/// Distance on the XZ plane from `(x, z)` to the nearest point of the
	/// rectangle. Zero when the point is inside.
	#[inline]
	pub fn distance_xz(&self, x: f32, z: f32) -> f32 {
		if self.contains_xz(x, z) {
			return 0.0;
		}
		let dx = if x < self.min_x {
			self.min_x - x
		} else if x > self.max_x {
			x - self.max_x
		} else {
			0.0
		};
		let dz = if z < self.min_z {
			self.min_z - z
		} else if z > self.max_z {
			z - self.max_z
		} else {
			0.0
		};
		(dx * dx + dz * dz).sqrt()
	}

	/// Lift to a 3D box with the given vertical center and half-extent.
	#[inline]
	pub fn to_aabb(&self, center_y: f32, half_height: f32) -> Aabb3 {
		let center = self.center();
		Aabb3::from_center_half_extents(
			Vec3::new(center.x, center_y, center.y),
			Vec3::new(self.width() * 0.5, half_height, self.depth() * 0.5),
		)
	}
}
