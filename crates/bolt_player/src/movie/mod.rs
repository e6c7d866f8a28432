//! Movie playback.
//!
//! A [`Movie`] pulls packets from a PF stream on demand, steps the movie
//! timeline once per frame period and drives cel animation, color cycles,
//! fades and the audio stream through a [`MovieHost`].
//!
//! The player is single threaded and message driven. Time advances only
//! through [`BoltMsg::AddTicks`] messages; each elapsed frame period fires
//! the frame timer, which refills the audio queue, drives the fade and
//! steps the timeline.

mod cels;
mod fade;
mod stream;
mod timeline;

#[cfg(test)]
mod tests;

use std::io::Read;

use bolt_types::file::{
	BoltError, CelSequence, FileType, PLANE_COLORS, PfFile, PfSource, Queue01Image, Timeline, TimelineOp, fourcc_to_string,
};
use log::{debug, error, warn};
use serde::Serialize;

use crate::audio::AudioSink;
use crate::graphics::{Graphics, ImageRef, MAX_COLOR_CYCLES, PaletteSink, Plane, Surface};
use crate::message::{BoltMsg, BoltRsp};
use crate::{PlayerConfig, PlayerError};

pub use cels::ScrollDirection;
pub use stream::NUM_VIDEO_QUEUES;

use cels::CelAnimator;
use fade::Fade;
use stream::{PacketStream, Queue};
use timeline::TimelineCursor;

/// Services the owner of a movie provides
pub trait MovieHost {
	/// Drawing surface
	type Surface: Surface;
	/// Palette sink
	type Palette: PaletteSink;
	/// Audio output
	type Audio: AudioSink;

	/// Planes and palettes
	fn graphics(&mut self) -> &mut Graphics<Self::Surface, Self::Palette>;

	/// Audio output
	fn audio(&mut self) -> &mut Self::Audio;

	/// Asks the engine to deliver `msg` before waiting for input
	fn set_next_msg(&mut self, msg: BoltMsg);

	/// Asks the engine for a [`BoltMsg::SmoothAnimation`] message
	fn request_smooth_animation(&mut self);
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackMode {
	/// No movie loaded
	Idle,
	/// Frame timer armed, timeline stepping
	Playing,
	/// Every timeline command has fired; audio may still be playing
	Finished,
}

#[derive(Debug, Clone, Copy, Default)]
struct FrameTimer {
	period: u32,
	ticks: u32,
}

/// Callback receiving the opcode of trigger events
pub type TriggerCallback = Box<dyn FnMut(u16)>;

/// Movie player
///
/// Created once and started many times. [`Movie::stop`] releases every
/// buffer so that the next start begins from a clean slate.
pub struct Movie {
	config: PlayerConfig,
	stream: PacketStream,
	timeline: Option<TimelineCursor>,
	cels: CelAnimator,
	fade: Fade,
	num_color_cycles: usize,
	frame_timer: FrameTimer,
	audio_loaded: bool,
	audio_started: bool,
	mode: PlaybackMode,
	trigger: Option<TriggerCallback>,
}

impl Default for Movie {
	fn default() -> Self {
		Self::new(PlayerConfig::default())
	}
}

impl Movie {
	/// Creates an idle player
	pub fn new(config: PlayerConfig) -> Self {
		Self {
			config,
			stream: PacketStream::default(),
			timeline: None,
			cels: CelAnimator::default(),
			fade: Fade::default(),
			num_color_cycles: 0,
			frame_timer: FrameTimer::default(),
			audio_loaded: false,
			audio_started: false,
			mode: PlaybackMode::Idle,
			trigger: None,
		}
	}

	/// Player configuration
	pub fn config(&self) -> &PlayerConfig {
		&self.config
	}

	/// Sets the callback invoked by trigger event commands
	pub fn set_trigger_callback(&mut self, callback: impl FnMut(u16) + 'static) {
		self.trigger = Some(Box::new(callback));
	}

	/// Starts the movie named `name` in a PF file
	///
	/// A movie missing from the directory leaves the player idle and
	/// returns [`BoltError::MovieNotFound`].
	pub fn start_from<H: MovieHost, S: PfSource>(
		&mut self,
		host: &mut H,
		pf: &PfFile<S>,
		name: u32,
	) -> Result<(), PlayerError> {
		debug!("loading movie {} ...", fourcc_to_string(name));
		self.stop(host);
		match pf.seek_movie(name)? {
			Some(reader) => self.start(host, reader),
			None => Err(BoltError::MovieNotFound(fourcc_to_string(name)).into()),
		}
	}

	/// Starts playing the packet stream read from `reader`
	///
	/// The first timeline frame is stepped immediately. A stream without a
	/// valid timeline leaves the player idle.
	pub fn start<H: MovieHost, R: Read + 'static>(&mut self, host: &mut H, reader: R) -> Result<(), PlayerError> {
		self.stop(host);

		self.stream.open(Box::new(reader));
		self.mode = PlaybackMode::Playing;
		self.load_audio(host);

		if let Err(e) = self.start_timeline(host) {
			error!("Failed to start movie: {e}");
			self.stop(host);
			return Err(e.into());
		}

		host.set_next_msg(BoltMsg::Drive);
		Ok(())
	}

	/// Stops playback and releases every buffer
	///
	/// Callable in any state.
	pub fn stop<H: MovieHost>(&mut self, host: &mut H) {
		if self.audio_loaded {
			host.audio().stop();
		}
		if self.num_color_cycles > 0 {
			host.graphics().reset_color_cycles();
		}

		self.stream.reset();
		self.timeline = None;
		self.cels.reset();
		self.fade = Fade::default();
		self.num_color_cycles = 0;
		self.frame_timer = FrameTimer::default();
		self.audio_loaded = false;
		self.audio_started = false;
		self.mode = PlaybackMode::Idle;
	}

	/// Returns true while the timeline is stepping or the audio is playing
	pub fn is_running<H: MovieHost>(&self, host: &mut H) -> bool {
		let timeline_active = self.timeline.as_ref().is_some_and(TimelineCursor::is_active);
		timeline_active || (self.audio_started && host.audio().is_playing())
	}

	/// Playback state
	pub fn mode(&self) -> PlaybackMode {
		self.mode
	}

	/// Frames stepped since the movie started
	pub fn current_frame(&self) -> u32 {
		self.timeline.as_ref().map_or(0, TimelineCursor::cur_frame)
	}

	/// Milliseconds between frames, 0 when idle
	pub fn frame_period(&self) -> u32 {
		self.timeline.as_ref().map_or(0, TimelineCursor::frame_period)
	}

	/// Current cel camera position
	pub fn camera(&self) -> (i32, i32) {
		self.cels.camera()
	}

	/// Color cycles started by the movie
	pub fn color_cycles(&self) -> usize {
		self.num_color_cycles
	}

	/// Returns true while a fade is in progress
	pub fn is_fading(&self) -> bool {
		self.fade.is_active()
	}

	/// Packets read since the movie started
	pub fn packets_read(&self) -> usize {
		self.stream.packets_read()
	}

	/// Returns true while any movie data is held
	pub fn holds_buffers(&self) -> bool {
		self.stream.buffered_bytes() > 0 || self.timeline.is_some() || self.cels.holds_buffers()
	}

	/// Handles an engine message
	pub fn handle_msg<H: MovieHost>(&mut self, host: &mut H, msg: BoltMsg) -> BoltRsp {
		if self.mode == PlaybackMode::Idle {
			return BoltRsp::Pass;
		}

		match msg {
			BoltMsg::SmoothAnimation => {
				self.fade.drive(host.graphics());
				self.request_smooth_animation(host);
			}
			BoltMsg::AddTicks(ticks) => {
				self.fade.add_ticks(ticks);
				self.request_smooth_animation(host);
				self.run_frame_timer(host, ticks);
			}
			_ => {}
		}
		BoltRsp::Done
	}

	fn run_frame_timer<H: MovieHost>(&mut self, host: &mut H, ticks: u32) {
		self.frame_timer.ticks = self.frame_timer.ticks.saturating_add(ticks);
		let period = self.frame_timer.period;
		let mut fired = 0;
		while self.mode != PlaybackMode::Idle && period > 0 && self.frame_timer.ticks >= period {
			if fired == self.config.max_catch_up_frames {
				debug!("Dropping {} ms of movie time", self.frame_timer.ticks - self.frame_timer.ticks % period);
				self.frame_timer.ticks %= period;
				break;
			}
			self.frame_timer.ticks -= period;
			fired += 1;

			if let Err(e) = self.on_frame(host) {
				error!("Movie aborted: {e}");
				self.stop(host);
			}
		}
	}

	fn on_frame<H: MovieHost>(&mut self, host: &mut H) -> Result<(), BoltError> {
		self.drive_audio(host);
		self.fade.drive(host.graphics());
		self.step_timeline(host)?;
		self.request_smooth_animation(host);
		Ok(())
	}

	fn request_smooth_animation<H: MovieHost>(&self, host: &mut H) {
		if self.config.smooth_fades && self.fade.is_active() {
			host.request_smooth_animation();
		}
	}

	fn load_audio<H: MovieHost>(&mut self, host: &mut H) {
		host.audio().open_stream(self.config.audio_sample_rate);
		self.audio_loaded = true;
		self.stream.open_audio();
		self.drive_audio(host);
	}

	fn drive_audio<H: MovieHost>(&mut self, host: &mut H) {
		self.stream.fill_audio_queue(host.audio(), self.config.audio_packets_to_queue);
	}

	fn play_audio<H: MovieHost>(&mut self, host: &mut H) {
		if self.audio_loaded && !self.audio_started {
			host.audio().play();
			self.audio_started = true;
		}
	}

	fn start_timeline<H: MovieHost>(&mut self, host: &mut H) -> Result<(), BoltError> {
		let Some(buf) = self.stream.fetch_buffer(Queue::Timeline, host.audio()) else {
			return Err(BoltError::corrupt(FileType::Timeline, "movie has no timeline"));
		};
		let timeline = Timeline::from_bytes(&buf)?;
		debug!(
			"timeline: {} commands, frame period {} ms",
			timeline.commands.len(),
			timeline.header.frame_period
		);
		let timeline = TimelineCursor::new(timeline);

		self.frame_timer = FrameTimer {
			period: timeline.frame_period(),
			ticks: 0,
		};
		self.timeline = Some(timeline);
		self.step_timeline(host)
	}

	fn step_timeline<H: MovieHost>(&mut self, host: &mut H) -> Result<(), BoltError> {
		let Some(timeline) = self.timeline.as_mut() else {
			return Ok(());
		};
		if !timeline.is_active() {
			self.finish_timeline();
			self.play_audio(host);
			return Ok(());
		}

		timeline.begin_frame();
		while let Some(op) = self.timeline.as_mut().and_then(TimelineCursor::next_due) {
			self.run_op(host, op)?;
		}
		if !self.timeline.as_ref().is_some_and(TimelineCursor::is_active) {
			self.finish_timeline();
		}

		host.graphics().mark_dirty();
		self.play_audio(host);
		Ok(())
	}

	fn finish_timeline(&mut self) {
		if self.mode == PlaybackMode::Playing {
			debug!("timeline finished at frame {}", self.current_frame());
			self.mode = PlaybackMode::Finished;
		}
	}

	fn run_op<H: MovieHost>(&mut self, host: &mut H, op: TimelineOp) -> Result<(), BoltError> {
		match op {
			TimelineOp::DrawFore => {
				if let Some(buf) = self.stream.fetch_buffer(Queue::Video(0), host.audio()) {
					let image = Queue01Image::from_bytes(buf)?;
					apply_image_palette(host, Plane::Fore, &image);
					host.graphics().draw_at(Plane::Fore, 0, 0, &image_ref(&image));
				}
			}
			TimelineOp::DrawBack => {
				host.graphics().clear_plane(Plane::Fore);
				if let Some(buf) = self.stream.fetch_buffer(Queue::Video(1), host.audio()) {
					let image = Queue01Image::from_bytes(buf)?;
					apply_image_palette(host, Plane::Back, &image);
					host.graphics().draw_at(Plane::Back, 0, 0, &image_ref(&image));
				}
			}
			TimelineOp::StartColorCycles {
				start,
				plane,
				num,
				delay,
			} => {
				debug!("start color cycles ({start}, {plane}, {num}, {delay})");
				if plane != 1 {
					warn!("Color cycling plane not 1 in movie");
				}
				if self.num_color_cycles >= MAX_COLOR_CYCLES {
					warn!("tried to start too many color cycles");
					return Ok(());
				}
				let end = start.saturating_add(num.saturating_sub(1));
				let delay_ms = u32::from(delay.unsigned_abs());
				let graphics = host.graphics();
				if delay < 0 {
					graphics.set_color_cycle(self.num_color_cycles, Plane::Back, end, start, delay_ms);
				} else {
					graphics.set_color_cycle(self.num_color_cycles, Plane::Back, start, end, delay_ms);
				}
				self.num_color_cycles += 1;
			}
			TimelineOp::StopColorCycles => {
				debug!("stop color cycles");
				host.graphics().reset_color_cycles();
				self.num_color_cycles = 0;
			}
			TimelineOp::StartCelSequence => {
				if let Some(buf) = self.stream.fetch_buffer(Queue::Video(4), host.audio()) {
					self.cels.load(CelSequence::from_bytes(buf)?);
				}
			}
			TimelineOp::StepCelSequence => {
				self.cels.step(&mut self.stream, host)?;
			}
			TimelineOp::Fade {
				duration,
				direction,
			} => {
				debug!("fade ({duration}, {direction})");
				self.fade.start(duration, direction);
			}
			TimelineOp::Name(name) => {
				debug!("movie name {}", fourcc_to_string(name));
			}
			TimelineOp::TriggerEvent(opcode) => {
				debug!("trigger event 0x{opcode:04X}");
				if let Some(trigger) = self.trigger.as_mut() {
					trigger(opcode);
				}
			}
		}
		Ok(())
	}
}

/// Sets a plane palette from the palette embedded in a queue 0/1 image
pub(crate) fn apply_image_palette<H: MovieHost>(host: &mut H, plane: Plane, image: &Queue01Image) {
	host.graphics().set_plane_palette(plane, image.palette(), 0, PLANE_COLORS);
}

pub(crate) fn image_ref(image: &Queue01Image) -> ImageRef<'_> {
	ImageRef {
		encoding: image.encoding(),
		width: image.header.width,
		height: image.header.height,
		data: image.pixels(),
	}
}
