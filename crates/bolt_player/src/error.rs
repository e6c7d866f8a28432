//! Error type of the movie player.

use bolt_types::file::BoltError;
use thiserror::Error;

/// Errors raised by the player
#[derive(Debug, Error)]
pub enum PlayerError {
	/// Resource or movie data could not be read
	#[error(transparent)]
	Bolt(#[from] BoltError),

	/// Player configuration could not be loaded
	#[error("invalid player configuration: {0}")]
	Config(#[from] config::ConfigError),
}

impl PlayerError {
	/// Returns true when the error comes from malformed asset content
	pub fn is_corrupt_asset(&self) -> bool {
		matches!(self, Self::Bolt(e) if e.is_corrupt_asset())
	}
}
