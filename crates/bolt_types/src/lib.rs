//! Data types and file formats of BOLT engine games (Merlin's Apprentice).
//!
//! # File Formats
//!
//! - **BOLTLIB**: directory-based resource container with BOLT-LZ compression
//! - **PF**: movie files made of interleaved timeline, audio and video packets
//!
//! # Movie Buffers
//!
//! - **Timeline**: frame-driven command list, the first buffer of a movie
//! - **Cels**: queue 4 cel sequences with their control streams
//! - **Images**: queue 0/1 images with embedded palettes
//!
//! # Examples
//!
//! ```no_run
//! use bolt_types::prelude::*;
//!
//! # fn main() -> Result<(), BoltError> {
//! let mut boltlib = BoltlibFile::open("MERLIN.BLT")?;
//! let palette = boltlib.load_palette(BltShortId(0x9D01).into())?;
//! println!("{} colors", palette.count());
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use bolt_types::prelude::*;` to import commonly used items.
pub mod prelude;
