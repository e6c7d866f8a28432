//! Cel sequence animation with background swaps and camera scrolling.

use bolt_types::file::{BoltError, CelOp, CelSequence, ImageEncoding, Queue01Image};
use log::{debug, warn};
use serde::Serialize;

use super::stream::{PacketStream, Queue};
use super::{MovieHost, apply_image_palette, image_ref};
use crate::graphics::{ImageRef, Plane};

/// Camera scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollDirection {
	/// Toward negative x
	Left,
	/// Toward positive x
	Right,
	/// Toward negative y
	Up,
	/// Toward positive y
	Down,
}

impl ScrollDirection {
	/// Direction of a scroll command code
	pub fn from_code(code: u8) -> Option<Self> {
		match code {
			0 => Some(Self::Left),
			1 => Some(Self::Right),
			2 => Some(Self::Up),
			3 => Some(Self::Down),
			_ => None,
		}
	}

	/// Camera movement per step
	pub fn velocity(self, speed: i32) -> (i32, i32) {
		match self {
			Self::Left => (-speed, 0),
			Self::Right => (speed, 0),
			Self::Up => (0, -speed),
			Self::Down => (0, speed),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scroll {
	duration: u32,
	velocity: (i32, i32),
	progress: u32,
	start: (i32, i32),
}

/// Playback state of the current cel sequence
///
/// The background and camera survive loading a new sequence so that a
/// scroll can continue across sequences.
#[derive(Debug, Default)]
pub(crate) struct CelAnimator {
	cels: Option<CelSequence>,
	background: Option<Queue01Image>,
	frame: usize,
	next_command: usize,
	camera: (i32, i32),
	next_camera: (i32, i32),
	scroll: Option<Scroll>,
}

impl CelAnimator {
	/// Drops every buffer and zeroes the camera
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Makes `cels` the current sequence without drawing it
	pub fn load(&mut self, cels: CelSequence) {
		self.cels = Some(cels);
		self.frame = 0;
		self.next_command = 0;
	}

	/// Current camera position
	pub fn camera(&self) -> (i32, i32) {
		self.camera
	}

	/// Camera position the next step moves to
	pub fn next_camera(&self) -> (i32, i32) {
		self.next_camera
	}

	/// Index of the next cel to draw
	pub fn frame(&self) -> usize {
		self.frame
	}

	/// Returns true while a scroll is in progress
	pub fn is_scrolling(&self) -> bool {
		self.scroll.is_some()
	}

	/// Returns true while a sequence or background is held
	pub fn holds_buffers(&self) -> bool {
		self.cels.is_some() || self.background.is_some()
	}

	/// Starts a linear scroll from the current camera position
	pub fn start_scroll(&mut self, duration: u16, speed: u8, direction: u8) {
		let velocity = match ScrollDirection::from_code(direction) {
			Some(direction) => direction.velocity(i32::from(speed)),
			None => {
				warn!("Invalid scroll type {direction}");
				(0, 0)
			}
		};
		self.scroll = Some(Scroll {
			duration: u32::from(duration),
			velocity,
			progress: 0,
			start: self.camera,
		});
	}

	/// Moves the target camera one scroll step
	///
	/// The scroll ends on the step after reaching its duration.
	pub fn advance_scroll(&mut self) {
		let Some(scroll) = self.scroll.as_mut() else {
			return;
		};
		scroll.progress += 1;
		if scroll.progress > scroll.duration {
			self.scroll = None;
			return;
		}
		let progress = scroll.progress as i32;
		self.next_camera = (
			scroll.start.0 + scroll.velocity.0 * progress,
			scroll.start.1 + scroll.velocity.1 * progress,
		);
	}

	/// Runs due control commands, scrolls and draws the current cel
	pub fn step<H: MovieHost>(&mut self, stream: &mut PacketStream, host: &mut H) -> Result<(), BoltError> {
		let Some(num_frames) = self.cels.as_ref().map(|c| c.frames.len()) else {
			warn!("No cels loaded");
			return Ok(());
		};
		if num_frames == 0 {
			warn!("Cel sequence has no frames");
			return Ok(());
		}
		if self.frame >= num_frames {
			self.frame = num_frames - 1;
			warn!("Ran past end of cel sequence");
		}

		self.run_commands(stream, host)?;
		self.advance_scroll();

		if self.next_camera != self.camera {
			self.camera = self.next_camera;
			self.draw_background(host);
		}

		self.draw_cel(host)?;
		self.frame += 1;
		Ok(())
	}

	fn run_commands<H: MovieHost>(&mut self, stream: &mut PacketStream, host: &mut H) -> Result<(), BoltError> {
		loop {
			let Some(cmd) = self.cels.as_ref().and_then(|c| c.commands.get(self.next_command)) else {
				return Ok(());
			};
			if self.frame < usize::from(cmd.cel_number) {
				return Ok(());
			}
			let op = cmd.op.clone();
			self.next_command += 1;

			match op {
				CelOp::LoadBack {
					camera_x,
					camera_y,
				} => {
					debug!("cel command: load background");
					self.camera = (i32::from(camera_x), i32::from(camera_y));
					self.next_camera = self.camera;
					self.background =
						stream.fetch_buffer(Queue::Video(1), host.audio()).map(Queue01Image::from_bytes).transpose()?;
					if let Some(background) = &self.background {
						apply_image_palette(host, Plane::Back, background);
					}
					self.draw_background(host);
				}
				CelOp::LoadForePalette {
					first,
					colors,
				} => {
					debug!("cel command: load fore palette num {} first {first}", colors.len() / 3);
					host.graphics().set_plane_palette(Plane::Fore, &colors, usize::from(first), colors.len() / 3);
				}
				CelOp::Scroll {
					duration,
					speed,
					direction,
				} => {
					debug!("cel command: scroll duration {duration}, speed {speed}, type {direction}");
					self.start_scroll(duration, speed, direction);
				}
			}
		}
	}

	fn draw_background<H: MovieHost>(&self, host: &mut H) {
		if let Some(background) = &self.background {
			host.graphics().draw_at(Plane::Back, -self.camera.0, -self.camera.1, &image_ref(background));
		}
	}

	fn draw_cel<H: MovieHost>(&self, host: &mut H) -> Result<(), BoltError> {
		let Some(cels) = &self.cels else {
			return Ok(());
		};
		let image = ImageRef {
			encoding: ImageEncoding::Rl7,
			width: cels.header.width,
			height: cels.header.height,
			data: cels.frame_data(self.frame)?,
		};
		host.graphics().draw_at(Plane::Fore, 0, 0, &image);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_scroll_ends_after_duration_plus_one_steps() {
		let mut cels = CelAnimator {
			camera: (5, 10),
			next_camera: (5, 10),
			..CelAnimator::default()
		};
		cels.start_scroll(4, 3, 3);
		for _ in 0..4 {
			cels.advance_scroll();
			assert!(cels.is_scrolling());
		}
		cels.advance_scroll();
		assert!(!cels.is_scrolling());
		assert_eq!(cels.next_camera(), (5, 10 + 3 * 4));
	}

	#[test]
	fn test_scroll_directions() {
		assert_eq!(ScrollDirection::from_code(0).map(|d| d.velocity(2)), Some((-2, 0)));
		assert_eq!(ScrollDirection::from_code(1).map(|d| d.velocity(2)), Some((2, 0)));
		assert_eq!(ScrollDirection::from_code(2).map(|d| d.velocity(2)), Some((0, -2)));
		assert_eq!(ScrollDirection::from_code(4), None);

		let mut cels = CelAnimator::default();
		cels.start_scroll(2, 9, 7);
		cels.advance_scroll();
		assert_eq!(cels.next_camera(), (0, 0));
		cels.advance_scroll();
		cels.advance_scroll();
		assert!(!cels.is_scrolling());
	}
}
