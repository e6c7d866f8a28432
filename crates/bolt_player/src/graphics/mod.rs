//! Drawing and palette collaborators.
//!
//! The player draws onto two 7-bit planes. Pixel decoding belongs to the
//! [`Surface`] implementation; palette state (base colors, color cycles and
//! the global fade level) is kept by [`Graphics`] which pushes the effective
//! colors to a [`PaletteSink`].

mod palette;


use std::fmt::Display;

use bolt_types::file::{ImageEncoding, PLANE_COLORS};
use log::{trace, warn};
use serde::Serialize;

use crate::message::BoltMsg;

pub use palette::{apply_color_cycles, apply_palette, apply_palette_mod, apply_palette_mod_blended};

/// Number of concurrent color cycles
pub const MAX_COLOR_CYCLES: usize = bolt_types::file::COLOR_CYCLE_SLOTS;

/// Bytes of one plane palette
pub const PLANE_PALETTE_SIZE: usize = PLANE_COLORS * 3;

/// Display plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Plane {
	/// Foreground plane, drawn over the background
	Fore,
	/// Background plane
	Back,
}

impl Plane {
	/// Both planes
	pub const ALL: [Plane; 2] = [Plane::Fore, Plane::Back];

	/// Index of the plane, 0 for the foreground
	pub const fn index(self) -> usize {
		match self {
			Plane::Fore => 0,
			Plane::Back => 1,
		}
	}

	/// Plane addressed by a resource plane number; anything but 0 is the background
	pub const fn from_number(number: u16) -> Self {
		if number == 0 {
			Plane::Fore
		} else {
			Plane::Back
		}
	}
}

impl Display for Plane {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Plane::Fore => write!(f, "fore"),
			Plane::Back => write!(f, "back"),
		}
	}
}

/// Encoded image handed to a surface
#[derive(Debug, Clone, Copy)]
pub struct ImageRef<'a> {
	/// Pixel encoding
	pub encoding: ImageEncoding,
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u16,
	/// Encoded pixels
	pub data: &'a [u8],
}

/// Pixel sink for both planes
pub trait Surface {
	/// Fills a plane with the transparent color
	fn clear_plane(&mut self, plane: Plane);

	/// Decodes `image` onto `plane` with its top left corner at `(x, y)`
	fn draw_at(&mut self, plane: Plane, x: i32, y: i32, image: &ImageRef<'_>);

	/// Color index at a pixel, 0 outside the plane
	fn query(&self, plane: Plane, x: i32, y: i32) -> u8;

	/// Requests presentation of the planes on the next frame
	fn mark_dirty(&mut self);
}

/// Receiver of effective palette colors
pub trait PaletteSink {
	/// Sets `count` RGB triples of `plane` starting at color `first`
	fn set_plane_palette(&mut self, plane: Plane, colors: &[u8], first: usize, count: usize);
}

/// Exact fraction used for fade levels and palette blends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ratio {
	num: i64,
	den: i64,
}

impl Ratio {
	/// Zero
	pub const ZERO: Ratio = Ratio {
		num: 0,
		den: 1,
	};

	/// One
	pub const ONE: Ratio = Ratio {
		num: 1,
		den: 1,
	};

	/// Creates `num / den`; a zero denominator yields one
	pub fn new(num: i64, den: i64) -> Self {
		if den == 0 {
			return Self::ONE;
		}
		if den < 0 {
			return Self {
				num: -num,
				den: -den,
			};
		}
		Self {
			num,
			den,
		}
	}

	/// Numerator
	pub fn numer(&self) -> i64 {
		self.num
	}

	/// Denominator, always positive
	pub fn denom(&self) -> i64 {
		self.den
	}

	/// `value * self`, truncated toward zero
	pub fn scale(&self, value: i64) -> i64 {
		value * self.num / self.den
	}

	/// Returns true for values at or below zero
	pub fn is_zero_or_less(&self) -> bool {
		self.num <= 0
	}

	/// Returns true for values at or above one
	pub fn is_one_or_more(&self) -> bool {
		self.num >= self.den
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColorCycle {
	plane: Plane,
	start: usize,
	end: usize,
	delay_ms: u32,
	elapsed: u32,
}

impl ColorCycle {
	fn range(&self) -> (usize, usize) {
		(self.start.min(self.end), self.start.max(self.end))
	}
}

/// Palette state of both planes in front of a surface and a palette sink
///
/// Color cycles advance on [`BoltMsg::AddTicks`] messages passed to
/// [`Graphics::handle_msg`].
pub struct Graphics<S, P> {
	surface: S,
	sink: P,
	base: [[u8; PLANE_PALETTE_SIZE]; 2],
	cycles: [Option<ColorCycle>; MAX_COLOR_CYCLES],
	fade: Ratio,
}

impl<S: Surface, P: PaletteSink> Graphics<S, P> {
	/// Creates graphics with black palettes and full brightness
	pub fn new(surface: S, sink: P) -> Self {
		Self {
			surface,
			sink,
			base: [[0; PLANE_PALETTE_SIZE]; 2],
			cycles: [None; MAX_COLOR_CYCLES],
			fade: Ratio::ONE,
		}
	}

	/// Drawing surface
	pub fn surface(&self) -> &S {
		&self.surface
	}

	/// Mutable drawing surface
	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}

	/// Palette sink
	pub fn sink(&self) -> &P {
		&self.sink
	}

	/// Sets the base colors of a plane range and pushes the faded colors
	///
	/// The range is clamped to the 128 colors of a plane.
	pub fn set_plane_palette(&mut self, plane: Plane, colors: &[u8], first: usize, count: usize) {
		let first = first.min(PLANE_COLORS);
		let count = count.min(PLANE_COLORS - first).min(colors.len() / 3);
		if count == 0 {
			return;
		}
		let base = &mut self.base[plane.index()];
		base[first * 3..(first + count) * 3].copy_from_slice(&colors[..count * 3]);
		self.push_range(plane, first, count);
	}

	/// Base color of a plane entry, ignoring the fade level
	pub fn base_color(&self, plane: Plane, index: usize) -> [u8; 3] {
		let base = &self.base[plane.index()];
		let i = index.min(PLANE_COLORS - 1) * 3;
		[base[i], base[i + 1], base[i + 2]]
	}

	/// Faded color of a plane entry
	pub fn color(&self, plane: Plane, index: usize) -> [u8; 3] {
		self.base_color(plane, index).map(|c| self.fade.scale(i64::from(c)).clamp(0, 255) as u8)
	}

	/// Fills a plane with the transparent color
	pub fn clear_plane(&mut self, plane: Plane) {
		self.surface.clear_plane(plane);
	}

	/// Draws an image onto a plane
	pub fn draw_at(&mut self, plane: Plane, x: i32, y: i32, image: &ImageRef<'_>) {
		self.surface.draw_at(plane, x, y, image);
	}

	/// Color index at a pixel
	pub fn query(&self, plane: Plane, x: i32, y: i32) -> u8 {
		self.surface.query(plane, x, y)
	}

	/// Requests presentation on the next frame
	pub fn mark_dirty(&mut self) {
		self.surface.mark_dirty();
	}

	/// Starts rotating colors `start..=end` of a plane by one entry every `delay_ms`
	///
	/// `start > end` rotates backwards. Slots beyond the fourth are ignored.
	pub fn set_color_cycle(&mut self, slot: usize, plane: Plane, start: u16, end: u16, delay_ms: u32) {
		let Some(entry) = self.cycles.get_mut(slot) else {
			warn!("Color cycle slot {slot} out of range, ignored");
			return;
		};
		let last = PLANE_COLORS - 1;
		trace!("color cycle {slot}: {plane} {start}..{end} every {delay_ms} ms");
		*entry = Some(ColorCycle {
			plane,
			start: usize::from(start).min(last),
			end: usize::from(end).min(last),
			delay_ms,
			elapsed: 0,
		});
	}

	/// Stops every color cycle; rotated colors stay where they are
	pub fn reset_color_cycles(&mut self) {
		self.cycles = [None; MAX_COLOR_CYCLES];
	}

	/// Number of running color cycles
	pub fn active_color_cycles(&self) -> usize {
		self.cycles.iter().flatten().count()
	}

	/// Sets the global fade level and pushes both planes
	pub fn set_fade(&mut self, fade: Ratio) {
		self.fade = fade;
		for plane in Plane::ALL {
			self.push_range(plane, 0, PLANE_COLORS);
		}
	}

	/// Global fade level
	pub fn fade(&self) -> Ratio {
		self.fade
	}

	/// Advances color cycles on tick messages
	pub fn handle_msg(&mut self, msg: &BoltMsg) {
		if let BoltMsg::AddTicks(ticks) = *msg {
			self.advance_color_cycles(ticks);
		}
	}

	fn advance_color_cycles(&mut self, ticks: u32) {
		for i in 0..MAX_COLOR_CYCLES {
			let Some(cycle) = self.cycles[i].as_mut() else {
				continue;
			};
			if cycle.delay_ms == 0 {
				continue;
			}
			cycle.elapsed = cycle.elapsed.saturating_add(ticks);
			let steps = cycle.elapsed / cycle.delay_ms;
			cycle.elapsed %= cycle.delay_ms;
			let cycle = *cycle;

			let (lo, hi) = cycle.range();
			let len = hi - lo + 1;
			let steps = (steps as usize) % len;
			if steps == 0 {
				continue;
			}

			let colors = &mut self.base[cycle.plane.index()][lo * 3..(hi + 1) * 3];
			if cycle.start <= cycle.end {
				colors.rotate_right(steps * 3);
			} else {
				colors.rotate_left(steps * 3);
			}
			self.push_range(cycle.plane, lo, len);
		}
	}

	fn push_range(&mut self, plane: Plane, first: usize, count: usize) {
		let base = &self.base[plane.index()][first * 3..(first + count) * 3];
		if self.fade.is_one_or_more() {
			self.sink.set_plane_palette(plane, base, first, count);
		} else {
			let faded = base.iter().map(|&c| self.fade.scale(i64::from(c)).max(0) as u8).collect::<Vec<_>>();
			self.sink.set_plane_palette(plane, &faded, first, count);
		}
	}
}
