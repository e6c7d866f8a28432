//! Error types for resource container and movie stream parsing.

use std::fmt::Display;

use thiserror::Error;

/// The kind of data an error was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// BOLTLIB resource container
	Boltlib,
	/// PF movie file
	Pf,
	/// Movie timeline buffer
	Timeline,
	/// Queue 4 cel sequence buffer
	Cels,
	/// Queue 0/1 image buffer
	Image,
	/// Palette, palette mod or color cycle record
	Palette,
	/// Raw sound resource
	Sound,
}

impl Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FileType::Boltlib => write!(f, "BOLTLIB"),
			FileType::Pf => write!(f, "PF"),
			FileType::Timeline => write!(f, "Timeline"),
			FileType::Cels => write!(f, "Cels"),
			FileType::Image => write!(f, "Image"),
			FileType::Palette => write!(f, "Palette"),
			FileType::Sound => write!(f, "Sound"),
		}
	}
}

/// Errors raised while loading resources and movie data
#[derive(Debug, Error)]
pub enum BoltError {
	/// Not enough data to parse a structure
	#[error("{file_type}: insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Kind of data being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Magic tag did not match
	#[error("{file_type}: invalid magic: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Kind of data being parsed
		file_type: FileType,
		/// Expected magic bytes
		expected: Vec<u8>,
		/// Actual bytes found
		actual: Vec<u8>,
	},

	/// The invalid-id sentinel was used to address a resource
	#[error("invalid resource id 0x{0:08X}")]
	InvalidId(u32),

	/// The offset part of a long resource id was not zero
	#[error("offset part of resource id 0x{id:08X} is not 0 (it is 0x{offset:04X})")]
	NonZeroOffset {
		/// Full resource id
		id: u32,
		/// Offending offset part
		offset: u16,
	},

	/// Directory number is beyond the directory table
	#[error("resource 0x{id:08X} refers to directory {dir} but only {count} exist")]
	DirectoryOutOfRange {
		/// Full resource id
		id: u32,
		/// Requested directory number
		dir: u8,
		/// Number of directories in the container
		count: usize,
	},

	/// Resource number is beyond its directory's resource table
	#[error("resource 0x{id:08X} refers to resource {res} but directory has only {count}")]
	ResourceOutOfRange {
		/// Full resource id
		id: u32,
		/// Requested resource number
		res: u8,
		/// Number of resources in the directory
		count: usize,
	},

	/// Stored resource type differs from the requested type
	#[error("resource 0x{id:08X} has type {actual} instead of {expected}")]
	TypeMismatch {
		/// Full resource id
		id: u32,
		/// Requested type
		expected: u32,
		/// Stored type
		actual: u32,
	},

	/// Compression tag is neither BOLT-LZ nor raw
	#[error("unknown compression type {0}")]
	UnknownCompression(u8),

	/// Structurally corrupt data; traversal of the asset cannot continue
	#[error("{file_type}: corrupt asset: {message}")]
	CorruptAsset {
		/// Kind of data being parsed
		file_type: FileType,
		/// Details
		message: String,
	},

	/// Movie name is not listed in the PF directory
	#[error("movie {0} not found")]
	MovieNotFound(String),

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// WAV export error
	#[error(transparent)]
	Wav(#[from] hound::Error),
}

impl BoltError {
	/// Creates an insufficient data error
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates a corrupt asset error
	pub fn corrupt(file_type: FileType, message: impl Into<String>) -> Self {
		Self::CorruptAsset {
			file_type,
			message: message.into(),
		}
	}

	/// Returns true when the error describes malformed asset content rather
	/// than an I/O failure or a bad request.
	pub fn is_corrupt_asset(&self) -> bool {
		matches!(
			self,
			Self::CorruptAsset { .. }
				| Self::UnknownCompression(_)
				| Self::TypeMismatch { .. }
				| Self::InsufficientData { .. }
				| Self::InvalidMagic { .. }
		)
	}
}

/// Checks that `data` holds at least `expected` bytes
pub(crate) fn ensure_len(data: &[u8], expected: usize, file_type: FileType) -> Result<(), BoltError> {
	if data.len() < expected {
		return Err(BoltError::insufficient_data(file_type, expected, data.len()));
	}
	Ok(())
}

/// Big-endian field readers with bounds checking
pub(crate) mod be {
	use super::{BoltError, FileType, ensure_len};

	pub fn u8_at(data: &[u8], offset: usize, file_type: FileType) -> Result<u8, BoltError> {
		ensure_len(data, offset + 1, file_type)?;
		Ok(data[offset])
	}

	pub fn u16_at(data: &[u8], offset: usize, file_type: FileType) -> Result<u16, BoltError> {
		ensure_len(data, offset + 2, file_type)?;
		Ok(u16::from_be_bytes([data[offset], data[offset + 1]]))
	}

	pub fn i16_at(data: &[u8], offset: usize, file_type: FileType) -> Result<i16, BoltError> {
		u16_at(data, offset, file_type).map(|v| v as i16)
	}

	pub fn u32_at(data: &[u8], offset: usize, file_type: FileType) -> Result<u32, BoltError> {
		ensure_len(data, offset + 4, file_type)?;
		Ok(u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]))
	}
}
