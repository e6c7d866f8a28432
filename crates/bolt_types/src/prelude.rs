//! Prelude module for `bolt_types`.
//!
//! # Examples
//!
//! ```no_run
//! use bolt_types::prelude::*;
//!
//! # fn main() -> Result<(), BoltError> {
//! let pf = PfFile::open("MERLIN.PF")?;
//! let intro = pf.seek_movie(fourcc("INTR"))?;
//! # Ok(())
//! # }
//! ```

#[doc(inline)]
pub use crate::file::{
	// Resource containers
	BltId,
	BltPalette,
	BltRecord,
	BltShortId,
	BltSound,
	BltType,
	BoltError,
	BoltlibBuilder,
	BoltlibFile,
	Compression,
	FileType,

	// Movies
	CelSequence,
	ImageEncoding,
	MovieBuilder,
	PacketHeader,
	PacketType,
	PfBuilder,
	PfFile,
	Queue01Image,
	Timeline,
	TimelineOp,

	fourcc,
	fourcc_to_string,
};
