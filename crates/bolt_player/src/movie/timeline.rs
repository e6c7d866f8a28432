//! Frame scheduling of timeline commands.

use bolt_types::file::{Timeline, TimelineOp};
use log::warn;

/// Cursor over a decoded timeline
///
/// Each frame, [`TimelineCursor::begin_frame`] advances the frame counter
/// and [`TimelineCursor::next_due`] yields the commands due in that frame.
/// A command waits `delay` frames after the previous firing and fires
/// `reps` times before the cursor moves on.
#[derive(Debug, Clone)]
pub(crate) struct TimelineCursor {
	timeline: Timeline,
	frame_period: u32,
	command: usize,
	reps: u8,
	cur_frame: u32,
	last_fired: u32,
	active: bool,
}

impl TimelineCursor {
	pub fn new(timeline: Timeline) -> Self {
		let frame_period = match timeline.header.frame_period {
			0 => {
				warn!("Movie frame period is 0, using 1 ms");
				1
			}
			period => u32::from(period),
		};
		let reps = timeline.commands.first().map_or(0, |c| c.reps);
		let active = !timeline.commands.is_empty();
		Self {
			timeline,
			frame_period,
			command: 0,
			reps,
			cur_frame: 0,
			last_fired: 0,
			active,
		}
	}

	/// Milliseconds between frames
	pub fn frame_period(&self) -> u32 {
		self.frame_period
	}

	/// Frames stepped so far
	pub fn cur_frame(&self) -> u32 {
		self.cur_frame
	}

	/// Index of the command under the cursor
	pub fn command_index(&self) -> usize {
		self.command
	}

	/// Returns true until every command has fired
	pub fn is_active(&self) -> bool {
		self.active
	}

	pub fn begin_frame(&mut self) {
		self.cur_frame += 1;
	}

	/// Next command due in the current frame
	pub fn next_due(&mut self) -> Option<TimelineOp> {
		while self.active {
			let cmd = &self.timeline.commands[self.command];
			if self.reps == 0 {
				self.command += 1;
				match self.timeline.commands.get(self.command) {
					Some(next) => self.reps = next.reps,
					None => self.active = false,
				}
			} else if self.cur_frame - self.last_fired < u32::from(cmd.delay) {
				return None;
			} else {
				self.last_fired = self.cur_frame;
				self.reps -= 1;
				return Some(cmd.op);
			}
		}
		None
	}
}
