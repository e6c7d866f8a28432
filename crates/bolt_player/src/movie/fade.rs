//! Timed linear palette fades.

use log::warn;

use crate::graphics::{Graphics, PaletteSink, Ratio, Surface};

/// Fade in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Fade {
	timer: u32,
	duration: u16,
	direction: i8,
}

impl Fade {
	/// Starts a fade; `1` fades in, `-1` fades out
	pub fn start(&mut self, duration: u16, direction: i16) {
		self.timer = 0;
		self.duration = duration;
		self.direction = match direction {
			1 => 1,
			-1 => -1,
			_ => {
				warn!("Invalid fade direction {direction}");
				0
			}
		};
	}

	pub fn is_active(&self) -> bool {
		self.direction != 0
	}

	pub fn add_ticks(&mut self, ticks: u32) {
		if self.is_active() {
			self.timer = self.timer.saturating_add(ticks);
		}
	}

	/// Pushes the current fade level; ends the fade once its time is up
	pub fn drive<S: Surface, P: PaletteSink>(&mut self, graphics: &mut Graphics<S, P>) {
		let duration = u32::from(self.duration);
		let done = self.timer >= duration;
		match self.direction {
			1 if done => {
				graphics.set_fade(Ratio::ONE);
				self.direction = 0;
			}
			1 => graphics.set_fade(Ratio::new(i64::from(self.timer), i64::from(duration))),
			-1 if done => {
				graphics.set_fade(Ratio::ZERO);
				self.direction = 0;
			}
			-1 => graphics.set_fade(Ratio::new(i64::from(duration - self.timer), i64::from(duration))),
			_ => {}
		}
	}
}
