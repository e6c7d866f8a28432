//! Fixed-size records of the container header and tables.

use std::fmt::Display;

use serde::Serialize;

use crate::file::{BoltError, FileType, be, ensure_len};

use super::constants::{
	COMPRESSION_LZ, COMPRESSION_RAW, DIRECTORY_ENTRY_SIZE, HEADER_SIZE, MAGIC, RESOURCE_ENTRY_SIZE,
};

/// Container header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
	/// Number of directories
	pub num_dirs: u8,
	/// Total file size as recorded by the packer
	pub file_size: u32,
}

impl Header {
	/// Parses a header, validating the magic tag
	pub fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		ensure_len(data, HEADER_SIZE, FileType::Boltlib)?;

		if &data[0..4] != MAGIC {
			return Err(BoltError::InvalidMagic {
				file_type: FileType::Boltlib,
				expected: MAGIC.to_vec(),
				actual: data[0..4].to_vec(),
			});
		}

		Ok(Self {
			num_dirs: data[0x0B],
			file_size: be::u32_at(data, 0x0C, FileType::Boltlib)?,
		})
	}

	/// Serializes the header
	pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
		let mut bytes = [0u8; HEADER_SIZE];
		bytes[0..4].copy_from_slice(MAGIC);
		bytes[0x0B] = self.num_dirs;
		bytes[0x0C..0x10].copy_from_slice(&self.file_size.to_be_bytes());
		bytes
	}
}

/// Directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
	/// Number of resources in the directory
	pub num_resources: u32,
	/// Number of bytes read for each compressed resource
	pub comp_read_size: u32,
	/// File offset of the resource table
	pub table_offset: u32,
}

impl DirectoryEntry {
	/// Parses a directory entry
	pub fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		ensure_len(data, DIRECTORY_ENTRY_SIZE, FileType::Boltlib)?;
		Ok(Self {
			num_resources: be::u32_at(data, 0, FileType::Boltlib)?,
			comp_read_size: be::u32_at(data, 4, FileType::Boltlib)?,
			table_offset: be::u32_at(data, 8, FileType::Boltlib)?,
		})
	}

	/// Serializes the entry; the reserved field is written as zero
	pub fn to_bytes(&self) -> [u8; DIRECTORY_ENTRY_SIZE] {
		let mut bytes = [0u8; DIRECTORY_ENTRY_SIZE];
		bytes[0..4].copy_from_slice(&self.num_resources.to_be_bytes());
		bytes[4..8].copy_from_slice(&self.comp_read_size.to_be_bytes());
		bytes[8..12].copy_from_slice(&self.table_offset.to_be_bytes());
		bytes
	}
}

/// Storage method of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Compression {
	/// BOLT-LZ compressed
	Lz,
	/// Stored as-is
	Raw,
}

impl Compression {
	/// Tag stored in the top byte of the resource entry
	pub const fn tag(self) -> u8 {
		match self {
			Compression::Lz => COMPRESSION_LZ,
			Compression::Raw => COMPRESSION_RAW,
		}
	}
}

impl TryFrom<u8> for Compression {
	type Error = BoltError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			COMPRESSION_LZ => Ok(Compression::Lz),
			COMPRESSION_RAW => Ok(Compression::Raw),
			other => Err(BoltError::UnknownCompression(other)),
		}
	}
}

impl Display for Compression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Compression::Lz => write!(f, "LZ"),
			Compression::Raw => write!(f, "raw"),
		}
	}
}

/// Resource entry
///
/// The compression tag is kept as stored so that listing a directory never
/// fails on an unknown tag; it is validated when the resource is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
	/// Compression tag (top byte of the first field)
	pub compression_tag: u8,
	/// Resource type (low 24 bits of the first field)
	pub resource_type: u32,
	/// Uncompressed size in bytes
	pub size: u32,
	/// File offset of the resource data
	pub offset: u32,
}

impl ResourceEntry {
	/// Parses a resource entry
	pub fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		ensure_len(data, RESOURCE_ENTRY_SIZE, FileType::Boltlib)?;
		let full_type = be::u32_at(data, 0, FileType::Boltlib)?;
		Ok(Self {
			compression_tag: (full_type >> 24) as u8,
			resource_type: full_type & 0x00FF_FFFF,
			size: be::u32_at(data, 4, FileType::Boltlib)?,
			offset: be::u32_at(data, 8, FileType::Boltlib)?,
		})
	}

	/// Serializes the entry; the reserved field is written as zero
	pub fn to_bytes(&self) -> [u8; RESOURCE_ENTRY_SIZE] {
		let full_type = (u32::from(self.compression_tag) << 24) | (self.resource_type & 0x00FF_FFFF);
		let mut bytes = [0u8; RESOURCE_ENTRY_SIZE];
		bytes[0..4].copy_from_slice(&full_type.to_be_bytes());
		bytes[4..8].copy_from_slice(&self.size.to_be_bytes());
		bytes[8..12].copy_from_slice(&self.offset.to_be_bytes());
		bytes
	}

	/// Decoded compression method
	pub fn compression(&self) -> Result<Compression, BoltError> {
		Compression::try_from(self.compression_tag)
	}
}
