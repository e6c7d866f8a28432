//! File and buffer formats of BOLT engine games.

mod error;

pub mod boltlib;
pub mod cels;
pub mod image;
pub mod palette;
pub mod pf;
pub mod record;
pub mod sound;
pub mod timeline;

// Re-export unified error type
pub use error::{BoltError, FileType};
pub(crate) use error::{be, ensure_len};

// Re-export main file types
pub use boltlib::{
	BltId, BltShortId, BltType, Builder as BoltlibBuilder, Compression, File as BoltlibFile,
};
pub use cels::{CelCommand, CelOp, CelSequence, CelSequenceBuilder, CelsHeader};
pub use image::{ImageEncoding, ImageHeader, Queue01Image};
pub use palette::{
	BltPalette, ColorCycle, ColorCycleSlot, ColorCycles, PaletteMod, COLOR_CYCLE_SLOTS, PLANE_COLORS,
};
pub use pf::{
	Builder as PfBuilder, File as PfFile, MovieBuilder, MovieEntry, PacketHeader, PacketType,
	PACKET_HEADER_SIZE, PfSource, fourcc, fourcc_to_string,
};
pub use record::{BltRecord, Rect, ResourceRef, S16Value, U8Value, U16Value};
pub use sound::{BltSound, SAMPLE_RATE};
pub use timeline::{Timeline, TimelineCommand, TimelineHeader, TimelineOp};
