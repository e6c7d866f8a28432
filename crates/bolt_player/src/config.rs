//! Runtime configuration of the movie player.
//!
//! Values come from defaults, then an optional TOML file, then `BOLT_*`
//! environment variables (for example `BOLT_MAX_CATCH_UP_FRAMES=4`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::PlayerError;

/// Player settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
	/// Audio buffers kept queued ahead of playback
	pub audio_packets_to_queue: usize,
	/// Sample rate of movie audio
	pub audio_sample_rate: u32,
	/// Most frame timer firings handled for a single tick message
	pub max_catch_up_frames: u32,
	/// Request smooth animation messages while fading
	pub smooth_fades: bool,
}

impl Default for PlayerConfig {
	fn default() -> Self {
		Self {
			audio_packets_to_queue: 2,
			audio_sample_rate: bolt_types::file::SAMPLE_RATE,
			max_catch_up_frames: 8,
			smooth_fades: true,
		}
	}
}

impl PlayerConfig {
	/// Loads the configuration, layering an optional TOML file and the
	/// environment over the defaults
	pub fn load(path: Option<&Path>) -> Result<Self, PlayerError> {
		let mut builder = config::Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
		}
		builder = builder.add_source(config::Environment::with_prefix("BOLT").try_parsing(true));

		Ok(builder.build()?.try_deserialize()?)
	}
}
