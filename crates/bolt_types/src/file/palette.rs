//! Palette resources
//!
//! ## Palette (type 10)
//!
//! | Offset | Size          | Description                 |
//! |--------|---------------|-----------------------------|
//! | 0x00   | 2             | Unknown                     |
//! | 0x02   | 2             | First color index           |
//! | 0x04   | 2             | Last color index            |
//! | 0x06   | 3 * (last+1)  | RGB triples, indexed from 0 |
//!
//! ## Color Cycles (type 11)
//!
//! | Offset | Size  | Description                                  |
//! |--------|-------|----------------------------------------------|
//! | 0x00   | 4 * 2 | Slot enable flags (1 = enabled)              |
//! | 0x08   | 4 * 4 | Color cycle slot ids (type 12), may be invalid |
//!
//! ## Color Cycle Slot (type 12)
//!
//! | Offset | Size | Description                 |
//! |--------|------|-----------------------------|
//! | 0x00   | 2    | First color index           |
//! | 0x02   | 2    | Last color index            |
//! | 0x04   | 1    | Frames (at 60 Hz) per step  |
//! | 0x05   | 1    | Plane                       |
//!
//! ## Palette Mods (type 29)
//!
//! Array of 6-byte elements: first color (u8), color count (u8) and the id
//! of a type 28 resource holding the RGB triples.

use std::io::{Read, Seek};

use log::warn;
use serde::Serialize;

use crate::file::boltlib::{self, BltId, BltType};
use crate::file::record::BltRecord;
use crate::file::{BoltError, FileType, be, ensure_len};

/// Number of colors in one plane palette
pub const PLANE_COLORS: usize = 128;

/// Number of color cycle slots
pub const COLOR_CYCLE_SLOTS: usize = 4;

/// Size of the palette header
const PALETTE_HEADER_SIZE: usize = 6;

/// Palette resource (type 10)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BltPalette {
	/// First color index
	pub first: u16,
	/// Last color index
	pub last: u16,
	data: Vec<u8>,
}

impl BltPalette {
	/// Parses a palette resource
	pub fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		ensure_len(data, PALETTE_HEADER_SIZE, FileType::Palette)?;
		Ok(Self {
			first: be::u16_at(data, 2, FileType::Palette)?,
			last: be::u16_at(data, 4, FileType::Palette)?,
			data: data.to_vec(),
		})
	}

	/// Number of colors to apply, clamped to one plane
	pub fn count(&self) -> usize {
		(i32::from(self.last) - i32::from(self.first) + 1).clamp(0, PLANE_COLORS as i32) as usize
	}

	/// RGB triples from `first` on, `count()` colors long
	///
	/// Shorter when the resource is truncated.
	pub fn colors(&self) -> &[u8] {
		let start = PALETTE_HEADER_SIZE + self.first as usize * 3;
		let end = (start + self.count() * 3).min(self.data.len());
		self.data.get(start..end).unwrap_or_default()
	}
}

/// Color cycle slot (type 12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorCycleSlot {
	/// First color index
	pub start: u16,
	/// Last color index
	pub end: u16,
	/// Frames at 60 Hz between steps
	pub frames: u8,
	/// Plane; always 0 in known data
	pub plane: u8,
}

impl ColorCycleSlot {
	/// Step delay in milliseconds
	pub fn delay_ms(&self) -> u32 {
		u32::from(self.frames) * 1000 / 60
	}
}

impl BltRecord for ColorCycleSlot {
	const TYPE: BltType = BltType::ColorCycleSlot;
	const SIZE: usize = 6;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		Ok(Self {
			start: be::u16_at(data, 0, FileType::Palette)?,
			end: be::u16_at(data, 2, FileType::Palette)?,
			frames: be::u8_at(data, 4, FileType::Palette)?,
			plane: be::u8_at(data, 5, FileType::Palette)?,
		})
	}
}

/// Raw color cycle set (type 11) before its slots are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorCyclesRecord {
	/// Slot enable flags
	pub num_slots: [u16; COLOR_CYCLE_SLOTS],
	/// Slot resource ids
	pub slot_ids: [BltId; COLOR_CYCLE_SLOTS],
}

impl BltRecord for ColorCyclesRecord {
	const TYPE: BltType = BltType::ColorCycles;
	const SIZE: usize = 0x18;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		let mut num_slots = [0u16; COLOR_CYCLE_SLOTS];
		let mut slot_ids = [BltId::INVALID; COLOR_CYCLE_SLOTS];
		for i in 0..COLOR_CYCLE_SLOTS {
			num_slots[i] = be::u16_at(data, i * 2, FileType::Palette)?;
			slot_ids[i] = BltId(be::u32_at(data, 8 + i * 4, FileType::Palette)?);
		}
		Ok(Self {
			num_slots,
			slot_ids,
		})
	}
}

/// Color cycle set with its slots loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorCycles {
	/// Slot enable flags
	pub num_slots: [u16; COLOR_CYCLE_SLOTS],
	/// Loaded slots; `None` where the id was invalid
	pub slots: [Option<ColorCycleSlot>; COLOR_CYCLE_SLOTS],
}

/// One runnable color cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorCycle {
	/// Slot number
	pub slot: usize,
	/// First color index
	pub start: u16,
	/// Last color index
	pub end: u16,
	/// Step delay in milliseconds
	pub delay_ms: u32,
}

impl ColorCycles {
	/// Enabled slots with a valid frame count
	///
	/// Slots with zero frames are skipped with a warning.
	pub fn active(&self) -> Vec<ColorCycle> {
		let mut cycles = Vec::new();
		for (i, slot) in self.slots.iter().enumerate() {
			let Some(slot) = slot else {
				continue;
			};
			if self.num_slots[i] != 1 {
				continue;
			}
			if slot.frames == 0 {
				warn!("Invalid color cycle frames in slot {i}");
				continue;
			}
			if slot.plane != 0 {
				warn!("Color cycle plane was not 0 (it was {})", slot.plane);
			}
			cycles.push(ColorCycle {
				slot: i,
				start: slot.start,
				end: slot.end,
				delay_ms: slot.delay_ms(),
			});
		}
		cycles
	}
}

/// Raw palette mod element (type 29) before its colors are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteModRecord {
	/// First color index
	pub first: u8,
	/// Number of colors
	pub num: u8,
	/// Id of the type 28 colors resource
	pub colors_id: BltId,
}

impl BltRecord for PaletteModRecord {
	const TYPE: BltType = BltType::PaletteMods;
	const SIZE: usize = 6;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		Ok(Self {
			first: be::u8_at(data, 0, FileType::Palette)?,
			num: be::u8_at(data, 1, FileType::Palette)?,
			colors_id: BltId(be::u32_at(data, 2, FileType::Palette)?),
		})
	}
}

/// Palette mod state with its colors loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteMod {
	/// First color index
	pub first: u8,
	/// Number of colors
	pub num: u8,
	/// RGB triples
	pub colors: Vec<u8>,
}

impl<R: Read + Seek> boltlib::File<R> {
	/// Loads a palette resource
	pub fn load_palette(&mut self, id: BltId) -> Result<BltPalette, BoltError> {
		let data = self.load_resource(id, BltType::Palette)?;
		BltPalette::from_bytes(&data)
	}

	/// Loads a color cycle set and every slot it references
	pub fn load_color_cycles(&mut self, id: BltId) -> Result<ColorCycles, BoltError> {
		let record: ColorCyclesRecord = self.load_record(id)?;
		let mut cycles = ColorCycles {
			num_slots: record.num_slots,
			..Default::default()
		};
		for (slot, slot_id) in cycles.slots.iter_mut().zip(record.slot_ids) {
			if slot_id.is_valid() {
				*slot = Some(self.load_record(slot_id)?);
			}
		}
		Ok(cycles)
	}

	/// Loads a palette mod list and the colors of every state
	pub fn load_palette_mods(&mut self, id: BltId) -> Result<Vec<PaletteMod>, BoltError> {
		let records: Vec<PaletteModRecord> = self.load_record_array(id)?;
		records
			.into_iter()
			.map(|record| {
				Ok(PaletteMod {
					first: record.first,
					num: record.num,
					colors: self.load_resource(record.colors_id, BltType::Colors)?,
				})
			})
			.collect()
	}
}
