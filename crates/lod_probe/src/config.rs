//! Probe configuration parsed from TOML.
//!
//! Every field has a default, so an empty file (or no file) describes the
//! reference terrain flown along a short approach path.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use terrain_lod::{BandedConfig, SelectionPolicy, TerrainConfig};

/// Root configuration for a probe run.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
	pub terrain: TerrainSection,
	pub policy: PolicySection,
	pub camera: CameraSection,
	pub path: PathSection,
}

/// Terrain and error-budget settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TerrainSection {
	pub world_size: f32,
	pub max_height: f32,
	pub vertical_padding: f32,
	/// Vertical field of view in degrees.
	pub fov_y_degrees: f32,
	pub screen_height: f32,
	pub max_screen_error: f32,
	pub geometric_error: [f32; 3],
	pub instance_capacity: usize,
	pub frames_in_flight: usize,
}

impl Default for TerrainSection {
	fn default() -> Self {
		let reference = TerrainConfig::default();
		Self {
			world_size: reference.world_size,
			max_height: reference.max_height,
			vertical_padding: reference.vertical_padding,
			fov_y_degrees: reference.fov_y.to_degrees(),
			screen_height: reference.screen_height,
			max_screen_error: reference.max_screen_error,
			geometric_error: reference.geometric_error,
			instance_capacity: reference.instance_capacity,
			frames_in_flight: reference.frames_in_flight,
		}
	}
}

impl TerrainSection {
	pub fn to_config(&self) -> TerrainConfig {
		TerrainConfig {
			world_size: self.world_size,
			max_height: self.max_height,
			vertical_padding: self.vertical_padding,
			fov_y: self.fov_y_degrees.to_radians(),
			screen_height: self.screen_height,
			max_screen_error: self.max_screen_error,
			geometric_error: self.geometric_error,
			instance_capacity: self.instance_capacity,
			frames_in_flight: self.frames_in_flight,
		}
	}
}

/// Which selection policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
	/// Recursive screen-space error.
	#[default]
	Sse,
	/// Distance bands, one level for the whole grid.
	Bands,
	/// Distance rings, one level per cell.
	Rings,
}

/// Selection policy settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PolicySection {
	pub kind: PolicyKind,
	/// Seconds between band level changes.
	pub cooldown: f32,
	/// Band level before the first frame.
	pub initial_level: u8,
}

impl Default for PolicySection {
	fn default() -> Self {
		let banded = BandedConfig::default();
		Self {
			kind: PolicyKind::default(),
			cooldown: banded.cooldown,
			initial_level: banded.initial_level,
		}
	}
}

impl PolicySection {
	/// Build the core policy for `kind` on a terrain of `world_size`.
	pub fn to_policy(&self, kind: PolicyKind, world_size: f32) -> SelectionPolicy {
		let banded = match kind {
			PolicyKind::Sse => return SelectionPolicy::ScreenSpaceError,
			PolicyKind::Bands => BandedConfig::uniform(),
			PolicyKind::Rings => BandedConfig::per_cell(world_size),
		};
		SelectionPolicy::DistanceBands(BandedConfig {
			cooldown: self.cooldown,
			initial_level: self.initial_level,
			..banded
		})
	}
}

/// Projection used to build the per-frame frustum.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraSection {
	pub aspect: f32,
	pub near: f32,
	pub far: f32,
}

impl Default for CameraSection {
	fn default() -> Self {
		Self {
			aspect: 16.0 / 9.0,
			near: 0.5,
			far: 5000.0,
		}
	}
}

/// Scripted viewer path.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathSection {
	/// Frames to simulate.
	pub frames: usize,
	/// Seconds per frame.
	pub frame_time: f32,
	/// Viewer positions, visited in order at constant speed per segment.
	pub waypoints: Vec<[f32; 3]>,
	/// Point the camera looks at; `None` looks along the direction of travel.
	pub look_at: Option<[f32; 3]>,
}

impl Default for PathSection {
	fn default() -> Self {
		Self {
			frames: 600,
			frame_time: 1.0 / 60.0,
			waypoints: vec![
				[0.0, 400.0, 2400.0],
				[0.0, 150.0, 400.0],
				[0.0, 60.0, 0.0],
				[-220.0, 90.0, -220.0],
				[0.0, 400.0, -2400.0],
			],
			look_at: None,
		}
	}
}

impl PathSection {
	/// Position at `t` in [0, 1] along the waypoints.
	pub fn sample(&self, t: f32) -> Vec3 {
		let points = &self.waypoints;
		match points.len() {
			0 => Vec3::ZERO,
			1 => Vec3::from_array(points[0]),
			n => {
				let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
				let i = (scaled.floor() as usize).min(n - 2);
				let a = Vec3::from_array(points[i]);
				let b = Vec3::from_array(points[i + 1]);
				a.lerp(b, scaled - i as f32)
			}
		}
	}
}

impl ProbeConfig {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		let config: ProbeConfig = toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
		config.check()?;
		Ok(config)
	}

	/// Checks the core does not cover.
	pub fn check(&self) -> Result<()> {
		if self.path.waypoints.is_empty() {
			anyhow::bail!("path must have at least one waypoint");
		}
		if !(self.path.frame_time > 0.0) {
			anyhow::bail!("frame_time must be positive, got {}", self.path.frame_time);
		}
		if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
			anyhow::bail!(
				"camera needs 0 < near < far, got near {} far {}",
				self.camera.near,
				self.camera.far
			);
		}
		Ok(())
	}
}
