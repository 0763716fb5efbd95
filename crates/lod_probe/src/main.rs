//! Headless terrain LOD probe.
//!
//! Flies a viewer along a scripted path over the terrain, runs tile
//! selection every frame and logs what would be drawn:
//! - tiles per level and instances written
//! - visibility culls and band level changes
//! - capacity overflows
//!
//! Run with `RUST_LOG=debug` to also see every band level change.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{Mat4, Vec3};
use terrain_lod::{Frustum, InstanceRecord, TerrainLod, TerrainRenderer, ViewState};

use config::{PolicyKind, ProbeConfig};

/// Headless flythrough driver for terrain tile LOD selection.
#[derive(Parser, Debug)]
#[command(name = "lod_probe")]
#[command(about = "Simulates a camera path and reports terrain tile selection")]
struct Args {
	/// Path to configuration TOML file (defaults apply when omitted).
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Override the configured selection policy.
	#[arg(short, long, value_enum)]
	policy: Option<PolicyKind>,

	/// Override the number of simulated frames.
	#[arg(short, long)]
	frames: Option<usize>,

	/// Log a frame summary every N frames.
	#[arg(long, default_value_t = 30)]
	every: usize,
}

/// Stand-in renderer that tallies what would be uploaded.
#[derive(Default)]
struct UploadTally {
	draws: u64,
	instances: u64,
	bytes: u64,
	max_instances: usize,
}

impl TerrainRenderer for UploadTally {
	fn draw_instanced(&mut self, _slot: usize, instances: &[InstanceRecord]) {
		self.draws += 1;
		self.instances += instances.len() as u64;
		self.bytes += std::mem::size_of_val(instances) as u64;
		self.max_instances = self.max_instances.max(instances.len());
	}
}

fn main() -> Result<()> {
	init_tracing();
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => {
			tracing::info!(path = %path.display(), "loading probe config");
			ProbeConfig::load(path)?
		}
		None => ProbeConfig::default(),
	};
	let frames = args.frames.unwrap_or(config.path.frames);
	let kind = args.policy.unwrap_or(config.policy.kind);

	let terrain = config.terrain.to_config();
	let policy = config.policy.to_policy(kind, terrain.world_size);
	let mut lod = TerrainLod::new(terrain.clone(), policy).context("Invalid terrain configuration")?;

	tracing::info!(
		policy = ?kind,
		frames,
		waypoints = config.path.waypoints.len(),
		"starting flythrough"
	);

	let projection = Mat4::perspective_rh(terrain.fov_y, config.camera.aspect, config.camera.near, config.camera.far);
	let mut tally = UploadTally::default();
	let mut overflow_frames = 0u64;
	let mut level_changes = 0u64;
	let mut level_frames = [0u64; 3];

	for frame in 0..frames {
		let t = frame as f32 / frames.saturating_sub(1).max(1) as f32;
		let eye = config.path.sample(t);
		let target = match config.path.look_at {
			Some(point) => Vec3::from_array(point),
			None => look_ahead(&config, eye, t, frames),
		};
		let frustum = Frustum::from_view_projection(projection * look_at(eye, target));

		let report = lod.update(&ViewState::new(eye, config.path.frame_time), &frustum);
		lod.render(&mut tally);

		if report.overflowed() {
			overflow_frames += 1;
		}
		level_changes += report.stats.level_changes as u64;
		for (total, count) in level_frames.iter_mut().zip(report.counts.0) {
			*total += count as u64;
		}

		if args.every > 0 && frame % args.every == 0 {
			tracing::info!(
				frame = report.frame,
				slot = report.slot,
				eye = ?eye.to_array(),
				distance = Vec3::new(eye.x, 0.0, eye.z).length(),
				band_level = ?report.band_level,
				culled = report.stats.culled,
				instances = report.instances,
				dropped = report.dropped,
				"{}",
				report.counts
			);
		}
	}

	let frame_count = frames.max(1) as f64;
	tracing::info!(
		draws = tally.draws,
		instances = tally.instances,
		max_instances = tally.max_instances,
		uploaded_kib = tally.bytes as f64 / 1024.0,
		overflow_frames,
		level_changes,
		avg_l0 = level_frames[0] as f64 / frame_count,
		avg_l1 = level_frames[1] as f64 / frame_count,
		avg_l2 = level_frames[2] as f64 / frame_count,
		"flythrough complete"
	);

	#[cfg(feature = "metrics")]
	tracing::info!(
		avg_selection_us = lod.metrics.avg_selection_timing_us(),
		selection_us_range = ?lod.metrics.selection_timings.min_max(),
		dropped_instances = lod.metrics.dropped_instances,
		"selection metrics"
	);

	Ok(())
}

fn init_tracing() {
	use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer())
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();
}

/// Point slightly further along the path, or the terrain center at the end.
fn look_ahead(config: &ProbeConfig, eye: Vec3, t: f32, frames: usize) -> Vec3 {
	let step = 4.0 / frames.max(1) as f32;
	let ahead = config.path.sample(t + step);
	if ahead.distance_squared(eye) > 1e-4 {
		ahead
	} else {
		Vec3::ZERO
	}
}

/// Right-handed view matrix, with a fallback up axis when looking straight
/// down.
///
/// A target at the eye has no direction; the camera then looks at the
/// terrain center, or straight down when already there.
fn look_at(eye: Vec3, target: Vec3) -> Mat4 {
	let mut direction = (target - eye).normalize_or_zero();
	if direction == Vec3::ZERO {
		tracing::debug!(eye = ?eye.to_array(), "look target at the eye, aiming at terrain center");
		direction = (-eye).normalize_or_zero();
	}
	if direction == Vec3::ZERO {
		direction = Vec3::NEG_Y;
	}
	let up = if direction.dot(Vec3::Y).abs() > 0.99 {
		Vec3::Z
	} else {
		Vec3::Y
	};
	Mat4::look_to_rh(eye, direction, up)
}
