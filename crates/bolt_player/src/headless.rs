//! Collaborators without a display or audio device.
//!
//! They record what the player asks of them, which is what the demos and
//! tests inspect.

use std::collections::VecDeque;

use bolt_types::file::{ImageEncoding, PLANE_COLORS};
use bytes::Bytes;
use log::trace;
use serde::Serialize;

use crate::audio::AudioSink;
use crate::graphics::{Graphics, ImageRef, PLANE_PALETTE_SIZE, PaletteSink, Plane, Surface};
use crate::message::BoltMsg;
use crate::movie::{Movie, MovieHost};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawCall {
	/// Target plane
	pub plane: Plane,
	/// Left edge
	pub x: i32,
	/// Top edge
	pub y: i32,
	/// Image width
	pub width: u16,
	/// Image height
	pub height: u16,
	/// Pixel encoding
	pub encoding: ImageEncoding,
	/// Encoded size in bytes
	pub data_len: usize,
}

/// Surface keeping two index planes and a log of draw calls
///
/// CLUT7 images are copied into the planes; RL7 images are only recorded.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
	width: usize,
	height: usize,
	planes: [Vec<u8>; 2],
	draws: Vec<DrawCall>,
	clears: [usize; 2],
	dirty: usize,
}

impl HeadlessSurface {
	/// Creates planes of the given size
	pub fn new(width: usize, height: usize) -> Self {
		Self {
			width,
			height,
			planes: [vec![0; width * height], vec![0; width * height]],
			draws: Vec::new(),
			clears: [0; 2],
			dirty: 0,
		}
	}

	/// Draw calls in order
	pub fn draws(&self) -> &[DrawCall] {
		&self.draws
	}

	/// Number of times a plane was cleared
	pub fn clears(&self, plane: Plane) -> usize {
		self.clears[plane.index()]
	}

	/// Number of presentation requests
	pub fn dirty_count(&self) -> usize {
		self.dirty
	}

	fn blit_clut7(&mut self, plane: Plane, x: i32, y: i32, image: &ImageRef<'_>) {
		let w = usize::from(image.width);
		for (row, src) in image.data.chunks(w.max(1)).take(usize::from(image.height)).enumerate() {
			let ty = y + row as i32;
			if ty < 0 || ty as usize >= self.height {
				continue;
			}
			for (col, &pixel) in src.iter().enumerate() {
				let tx = x + col as i32;
				if tx < 0 || tx as usize >= self.width {
					continue;
				}
				self.planes[plane.index()][ty as usize * self.width + tx as usize] = pixel & 0x7F;
			}
		}
	}
}

impl Surface for HeadlessSurface {
	fn clear_plane(&mut self, plane: Plane) {
		self.planes[plane.index()].fill(0);
		self.clears[plane.index()] += 1;
	}

	fn draw_at(&mut self, plane: Plane, x: i32, y: i32, image: &ImageRef<'_>) {
		trace!("draw {}x{} {} at {x},{y} on {plane}", image.width, image.height, image.encoding);
		if image.encoding == ImageEncoding::Clut7 {
			self.blit_clut7(plane, x, y, image);
		}
		self.draws.push(DrawCall {
			plane,
			x,
			y,
			width: image.width,
			height: image.height,
			encoding: image.encoding,
			data_len: image.data.len(),
		});
	}

	fn query(&self, plane: Plane, x: i32, y: i32) -> u8 {
		if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
			return 0;
		}
		self.planes[plane.index()][y as usize * self.width + x as usize]
	}

	fn mark_dirty(&mut self) {
		self.dirty += 1;
	}
}

/// Palette sink keeping the last colors of each plane
#[derive(Debug, Clone)]
pub struct HeadlessPalette {
	planes: [[u8; PLANE_PALETTE_SIZE]; 2],
	updates: usize,
}

impl Default for HeadlessPalette {
	fn default() -> Self {
		Self::new()
	}
}

impl HeadlessPalette {
	/// Creates black palettes
	pub fn new() -> Self {
		Self {
			planes: [[0; PLANE_PALETTE_SIZE]; 2],
			updates: 0,
		}
	}

	/// Last color set for a plane entry, clamped to the last entry
	pub fn color(&self, plane: Plane, index: usize) -> [u8; 3] {
		let i = index.min(PLANE_COLORS - 1) * 3;
		let p = &self.planes[plane.index()];
		[p[i], p[i + 1], p[i + 2]]
	}

	/// Number of palette updates received
	pub fn updates(&self) -> usize {
		self.updates
	}
}

impl PaletteSink for HeadlessPalette {
	fn set_plane_palette(&mut self, plane: Plane, colors: &[u8], first: usize, count: usize) {
		let p = &mut self.planes[plane.index()];
		let end = (first + count).min(p.len() / 3);
		if first < end {
			let n = ((end - first) * 3).min(colors.len());
			p[first * 3..first * 3 + n].copy_from_slice(&colors[..n]);
		}
		self.updates += 1;
	}
}

/// Mixer that plays queued audio as ticks elapse
#[derive(Debug, Clone, Default)]
pub struct HeadlessMixer {
	sample_rate: u32,
	open: bool,
	finished: bool,
	playing: bool,
	queue: VecDeque<Bytes>,
	played_in_front: usize,
	remainder: u64,
	samples_queued: usize,
	samples_played: usize,
}

impl HeadlessMixer {
	/// Creates an idle mixer
	pub fn new() -> Self {
		Self::default()
	}

	/// Plays `ms` milliseconds of audio
	pub fn advance(&mut self, ms: u32) {
		if !self.playing {
			return;
		}
		let total = u64::from(ms) * u64::from(self.sample_rate) + self.remainder;
		self.remainder = total % 1000;
		let mut samples = (total / 1000) as usize;

		while samples > 0 {
			let Some(front) = self.queue.front() else {
				break;
			};
			let left = front.len() - self.played_in_front;
			let n = left.min(samples);
			self.played_in_front += n;
			self.samples_played += n;
			samples -= n;
			if self.played_in_front == front.len() {
				self.queue.pop_front();
				self.played_in_front = 0;
			}
		}
	}

	/// Samples received since the stream was opened
	pub fn samples_queued(&self) -> usize {
		self.samples_queued
	}

	/// Samples played since the stream was opened
	pub fn samples_played(&self) -> usize {
		self.samples_played
	}

	/// Returns true once the stream was finished
	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Returns true while a stream exists
	pub fn is_open(&self) -> bool {
		self.open
	}
}

impl AudioSink for HeadlessMixer {
	fn open_stream(&mut self, sample_rate: u32) {
		*self = Self {
			sample_rate,
			open: true,
			..Self::default()
		};
	}

	fn queue_buffer(&mut self, samples: Bytes) {
		if !self.open || self.finished {
			return;
		}
		self.samples_queued += samples.len();
		if !samples.is_empty() {
			self.queue.push_back(samples);
		}
	}

	fn queued_buffers(&self) -> usize {
		self.queue.len()
	}

	fn finish_stream(&mut self) {
		self.finished = true;
	}

	fn play(&mut self) {
		if self.open {
			self.playing = true;
		}
	}

	fn stop(&mut self) {
		self.open = false;
		self.playing = false;
		self.queue.clear();
		self.played_in_front = 0;
	}

	fn is_playing(&self) -> bool {
		self.playing && !(self.finished && self.queue.is_empty())
	}
}

/// Host wiring the headless collaborators to a movie
pub struct HeadlessHost {
	/// Planes and palettes
	pub graphics: Graphics<HeadlessSurface, HeadlessPalette>,
	/// Audio output
	pub mixer: HeadlessMixer,
	/// Message the engine should deliver next
	pub next_msg: Option<BoltMsg>,
	/// Number of smooth animation requests
	pub smooth_requests: usize,
}

impl HeadlessHost {
	/// Creates a host with planes of the given size
	pub fn new(width: usize, height: usize) -> Self {
		Self {
			graphics: Graphics::new(HeadlessSurface::new(width, height), HeadlessPalette::new()),
			mixer: HeadlessMixer::new(),
			next_msg: None,
			smooth_requests: 0,
		}
	}

	/// Delivers a message the way the engine loop does
	///
	/// Graphics see every message first, then the movie handles it. Tick
	/// messages also play audio.
	pub fn dispatch(&mut self, movie: &mut Movie, msg: BoltMsg) {
		self.graphics.handle_msg(&msg);
		if let BoltMsg::AddTicks(ms) = msg {
			self.mixer.advance(ms);
		}
		movie.handle_msg(self, msg);
	}

	/// Delivers the pending next message, if any
	pub fn dispatch_pending(&mut self, movie: &mut Movie) -> bool {
		let Some(msg) = self.next_msg.take() else {
			return false;
		};
		self.dispatch(movie, msg);
		true
	}
}

impl MovieHost for HeadlessHost {
	type Surface = HeadlessSurface;
	type Palette = HeadlessPalette;
	type Audio = HeadlessMixer;

	fn graphics(&mut self) -> &mut Graphics<HeadlessSurface, HeadlessPalette> {
		&mut self.graphics
	}

	fn audio(&mut self) -> &mut HeadlessMixer {
		&mut self.mixer
	}

	fn set_next_msg(&mut self, msg: BoltMsg) {
		self.next_msg = Some(msg);
	}

	fn request_smooth_animation(&mut self) {
		self.smooth_requests += 1;
	}
}
