//! Resource identifiers.
//!
//! A resource is addressed by two bytes: `<directory number> <resource number>`.
//! For example, the resource `0x9D01` refers to resource 1 in directory `0x9D`.
//! Long ids stored inside resources append a 16-bit offset part which is
//! always zero.

use std::fmt::{self, Display};

use serde::Serialize;

/// 16-bit resource id made of a directory number and a resource number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BltShortId(pub u16);

impl BltShortId {
	/// Invalid-id sentinel
	pub const INVALID: Self = Self(0xFFFF);

	/// Creates a short id from its two parts
	pub const fn new(dir: u8, res: u8) -> Self {
		Self(((dir as u16) << 8) | res as u16)
	}

	/// Directory number
	pub const fn dir(self) -> u8 {
		(self.0 >> 8) as u8
	}

	/// Resource number within the directory
	pub const fn res(self) -> u8 {
		(self.0 & 0xFF) as u8
	}

	/// Returns false for the invalid sentinel
	pub const fn is_valid(self) -> bool {
		self.0 != Self::INVALID.0
	}
}

impl Default for BltShortId {
	fn default() -> Self {
		Self::INVALID
	}
}

impl Display for BltShortId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{:04X}", self.0)
	}
}

/// 32-bit resource id: `<short id> <offset>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BltId(pub u32);

impl BltId {
	/// Invalid-id sentinel
	pub const INVALID: Self = Self(0xFFFF_FFFF);

	/// Returns false for the invalid sentinel
	pub const fn is_valid(self) -> bool {
		self.0 != Self::INVALID.0
	}

	/// Short id part
	pub const fn short_id(self) -> BltShortId {
		BltShortId((self.0 >> 16) as u16)
	}

	/// Offset part; only zero is supported
	pub const fn offset(self) -> u16 {
		(self.0 & 0xFFFF) as u16
	}
}

impl Default for BltId {
	fn default() -> Self {
		Self::INVALID
	}
}

impl From<BltShortId> for BltId {
	fn from(short: BltShortId) -> Self {
		Self(u32::from(short.0) << 16)
	}
}

impl Display for BltId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{:08X}", self.0)
	}
}
