//! BOLT-LZ compression
//!
//! ## Overview
//!
//! BOLT-LZ is the byte-oriented LZ variant used for compressed resources in
//! BOLTLIB containers. It is a stream of control bytes, each followed by zero
//! or more argument bytes. The stream carries no end marker: decoding stops
//! when the output reaches the uncompressed size recorded in the resource
//! entry, so that size must always be known up front.
//!
//! ## Control Byte
//!
//! ```text
//!  7   6   5   4   3   2   1   0
//! +-------+---+-------------------+
//! | mode  | f |       num         |
//! +-------+---+-------------------+
//! ```
//!
//! | Mode | Flag | Arguments                 | Operation                                        |
//! |------|------|---------------------------|--------------------------------------------------|
//! | 0    | any  | `31 - num` literal bytes  | Copy literals                                    |
//! | 1    | f    | `off`                     | Copy `35 - num` bytes from `off + (f ? 256 : 0)` back |
//! | 2    | f    | `off`                     | Copy `(32 - num) * 4 + (f ? 2 : 0)` bytes from `off * 2` back |
//! | 3    | 1    | none                      | End marker, ignored                              |
//! | 3    | 0    | `hi`, ignored, `value`    | Fill `(32 - num + 32 * hi) * 4` bytes with `value` |
//!
//! Back references copy byte by byte, so a run longer than its offset
//! repeats the referenced pattern.
//!
//! ## Quirks
//!
//! - Mode 0 with `num == 31` copies nothing and wastes a control byte.
//! - The fill command carries one byte that the original decoder skips.
//! - Long repeats can only reach even offsets.

mod decode;
mod encode;

pub use decode::{decompress, decompress_to_vec};
pub use encode::compress;

mod modes {
	// Mode definitions (top two bits of the control byte)
	pub const LITERAL: u8 = 0;
	pub const SHORT_REPEAT: u8 = 1;
	pub const LONG_REPEAT: u8 = 2;
	pub const EXTENDED: u8 = 3;

	// Count biases
	pub const LITERAL_BIAS: u8 = 31;
	pub const SHORT_REPEAT_BIAS: u8 = 35;
}
