//! Applying palette resources to the planes.

use bolt_types::file::{BltPalette, ColorCycles, PLANE_COLORS, PaletteMod};
use log::warn;

use super::{Graphics, PaletteSink, Plane, Ratio, Surface};

/// Applies a palette resource to a plane
pub fn apply_palette<S: Surface, P: PaletteSink>(graphics: &mut Graphics<S, P>, plane: Plane, palette: &BltPalette) {
	graphics.set_plane_palette(plane, palette.colors(), usize::from(palette.first), palette.count());
}

/// Replaces the color cycles with the active slots of a color cycle set
pub fn apply_color_cycles<S: Surface, P: PaletteSink>(
	graphics: &mut Graphics<S, P>,
	plane: Plane,
	cycles: Option<&ColorCycles>,
) {
	graphics.reset_color_cycles();
	let Some(cycles) = cycles else {
		return;
	};
	for cycle in cycles.active() {
		graphics.set_color_cycle(cycle.slot, plane, cycle.start, cycle.end, cycle.delay_ms);
	}
}

/// Applies one state of a palette modification list
pub fn apply_palette_mod<S: Surface, P: PaletteSink>(
	graphics: &mut Graphics<S, P>,
	plane: Plane,
	mods: &[PaletteMod],
	state: usize,
) {
	let Some(m) = mods.get(state) else {
		warn!("Palette mod state {state} of {} does not exist", mods.len());
		return;
	};
	graphics.set_plane_palette(plane, &m.colors, usize::from(m.first), usize::from(m.num));
}

/// Applies a blend of two palette modification states
///
/// `t` at or below zero applies `state_a`, at or above one applies
/// `state_b`. Both states must cover the same color range.
pub fn apply_palette_mod_blended<S: Surface, P: PaletteSink>(
	graphics: &mut Graphics<S, P>,
	plane: Plane,
	mods: &[PaletteMod],
	state_a: usize,
	state_b: usize,
	t: Ratio,
) {
	let (Some(a), Some(b)) = (mods.get(state_a), mods.get(state_b)) else {
		warn!("Palette mod states {state_a}/{state_b} of {} do not exist", mods.len());
		return;
	};
	if a.first != b.first || a.num != b.num {
		warn!("Mismatched ranges in palette morph");
		return;
	}

	let first = usize::from(a.first);
	let num = usize::from(a.num);
	if first + num > PLANE_COLORS {
		warn!("Invalid range in palette morph");
		return;
	}

	if t.is_zero_or_less() {
		apply_palette_mod(graphics, plane, mods, state_a);
	} else if t.is_one_or_more() {
		apply_palette_mod(graphics, plane, mods, state_b);
	} else {
		let morphed = a
			.colors
			.iter()
			.zip(&b.colors)
			.take(num * 3)
			.map(|(&a, &b)| {
				let (a, b) = (i64::from(a), i64::from(b));
				(a + t.scale(b - a)) as u8
			})
			.collect::<Vec<_>>();
		graphics.set_plane_palette(plane, &morphed, first, num);
	}
}
