//! `PF` movie files
//!
//! A PF file starts with a movie directory followed by the packet streams of
//! every movie it holds.
//!
//! ## Movie Directory
//!
//! | Offset    | Size  | Description                         |
//! |-----------|-------|-------------------------------------|
//! | 0x00      | 4     | Number of movies                    |
//! | 0x04 + 8n | 4     | Movie name (four character code)    |
//! | 0x08 + 8n | 4     | Offset of the movie's first packet  |
//!
//! ## Packet
//!
//! | Offset | Size         | Description                          |
//! |--------|--------------|--------------------------------------|
//! | 0x00   | 4            | Total size of the logical buffer     |
//! | 0x04   | 4            | Size of this packet's payload        |
//! | 0x08   | 1            | Packet type                          |
//! | 0x09   | 1            | Reserved, always 0 in Merlin         |
//! | 0x0A   | partial size | Payload                              |
//!
//! A logical buffer larger than one packet is split across consecutive
//! packets of the same type, each repeating the total size.
//!
//! ## Packet Types
//!
//! | Type | Content                                              |
//! |------|------------------------------------------------------|
//! | 0    | Timeline, the first buffer of every movie            |
//! | 1    | Audio: unsigned 8-bit mono PCM at 22050 Hz           |
//! | 2    | Video buffer; first u16 selects queue 0 to 4         |
//! | 3    | Auxiliary video, routed like video                   |
//! | 0xFF | End of the movie's packets                           |
//!
//! All fields are big-endian.

mod builder;
mod file;

pub use builder::{Builder, MovieBuilder};
pub use file::{File, MovieEntry, PfSource};

use std::fmt::Display;
use std::io::Read;

use serde::Serialize;

use crate::file::BoltError;

mod constants {
	/// Size of a packet header
	pub const PACKET_HEADER_SIZE: usize = 10;

	/// Size of a movie directory entry
	pub const MOVIE_ENTRY_SIZE: usize = 8;
}

pub use constants::PACKET_HEADER_SIZE;

/// Packet type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PacketType {
	/// Timeline buffer
	Timeline,
	/// Audio samples
	Audio,
	/// Video buffer
	Video,
	/// Auxiliary video buffer, used for large scrolling backgrounds
	AuxVideo,
	/// End of packets
	Terminator,
	/// Any other type; skipped by players
	Unknown(u8),
}

impl From<u8> for PacketType {
	fn from(value: u8) -> Self {
		match value {
			0 => PacketType::Timeline,
			1 => PacketType::Audio,
			2 => PacketType::Video,
			3 => PacketType::AuxVideo,
			0xFF => PacketType::Terminator,
			other => PacketType::Unknown(other),
		}
	}
}

impl From<PacketType> for u8 {
	fn from(value: PacketType) -> Self {
		match value {
			PacketType::Timeline => 0,
			PacketType::Audio => 1,
			PacketType::Video => 2,
			PacketType::AuxVideo => 3,
			PacketType::Terminator => 0xFF,
			PacketType::Unknown(other) => other,
		}
	}
}

impl Display for PacketType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PacketType::Timeline => write!(f, "timeline"),
			PacketType::Audio => write!(f, "audio"),
			PacketType::Video => write!(f, "video"),
			PacketType::AuxVideo => write!(f, "aux video"),
			PacketType::Terminator => write!(f, "terminator"),
			PacketType::Unknown(t) => write!(f, "unknown (0x{t:02X})"),
		}
	}
}

/// Packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PacketHeader {
	/// Total size of the logical buffer this packet belongs to
	pub total_size: u32,
	/// Size of this packet's payload
	pub partial_size: u32,
	/// Packet type
	pub packet_type: PacketType,
	/// Reserved byte
	pub reserved: u8,
}

impl PacketHeader {
	/// Parses a header from its 10 bytes
	pub fn from_bytes(bytes: &[u8; PACKET_HEADER_SIZE]) -> Self {
		Self {
			total_size: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
			partial_size: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
			packet_type: PacketType::from(bytes[8]),
			reserved: bytes[9],
		}
	}

	/// Reads a header from the reader
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, BoltError> {
		let mut bytes = [0u8; PACKET_HEADER_SIZE];
		reader.read_exact(&mut bytes)?;
		Ok(Self::from_bytes(&bytes))
	}

	/// Serializes the header
	pub fn to_bytes(&self) -> [u8; PACKET_HEADER_SIZE] {
		let mut bytes = [0u8; PACKET_HEADER_SIZE];
		bytes[0..4].copy_from_slice(&self.total_size.to_be_bytes());
		bytes[4..8].copy_from_slice(&self.partial_size.to_be_bytes());
		bytes[8] = self.packet_type.into();
		bytes[9] = self.reserved;
		bytes
	}
}

/// Builds a four character code from its text form
///
/// Shorter names are padded with spaces; extra characters are dropped.
pub fn fourcc(name: &str) -> u32 {
	let mut bytes = [b' '; 4];
	for (dst, src) in bytes.iter_mut().zip(name.bytes()) {
		*dst = src;
	}
	u32::from_be_bytes(bytes)
}

/// Text form of a four character code
///
/// Non-printable bytes are shown as `.`.
pub fn fourcc_to_string(name: u32) -> String {
	name.to_be_bytes()
		.iter()
		.map(|&b| {
			if b.is_ascii_graphic() || b == b' ' {
				b as char
			} else {
				'.'
			}
		})
		.collect()
}
