//! Queue 0 and 1 image buffers
//!
//! Queue 0 buffers are foreground frames for scene changes, queue 1
//! buffers are backgrounds for cel sequences.
//!
//! | Offset | Size    | Description                            |
//! |--------|---------|----------------------------------------|
//! | 0x00   | 2       | Queue number (0 or 1)                  |
//! | 0x02   | 2       | Width                                  |
//! | 0x04   | 2       | Height                                 |
//! | 0x06   | 6       | Unknown                                |
//! | 0x0C   | 1       | Compression: 0 = CLUT7, otherwise RL7  |
//! | 0x0D   | 128 * 3 | Palette for the whole plane            |
//! | 0x18D  | ...     | Pixel data                             |

use std::fmt::Display;

use bytes::Bytes;
use serde::Serialize;

use crate::file::{BoltError, FileType, be, ensure_len};

/// Size of the image header
pub const IMAGE_HEADER_SIZE: usize = 0x0D;

/// Size of the embedded palette
pub const IMAGE_PALETTE_SIZE: usize = 128 * 3;

/// Pixel encoding of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageEncoding {
	/// Run-length 7-bit
	Rl7,
	/// Uncompressed 7-bit color indices
	Clut7,
}

impl Display for ImageEncoding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ImageEncoding::Rl7 => write!(f, "RL7"),
			ImageEncoding::Clut7 => write!(f, "CLUT7"),
		}
	}
}

/// Header of a queue 0/1 image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageHeader {
	/// Queue number
	pub queue_num: u16,
	/// Width
	pub width: u16,
	/// Height
	pub height: u16,
	/// Unknown bytes; the first is always 128 in Merlin
	pub unknown: [u8; 6],
	/// Compression byte
	pub compression: u8,
}

/// Queue 0/1 image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Queue01Image {
	/// Header
	pub header: ImageHeader,
	#[serde(skip)]
	data: Bytes,
}

impl Queue01Image {
	/// Wraps an image buffer, checking that the header and palette are present
	pub fn from_bytes(data: Bytes) -> Result<Self, BoltError> {
		let t = FileType::Image;
		ensure_len(&data, IMAGE_HEADER_SIZE + IMAGE_PALETTE_SIZE, t)?;

		let mut unknown = [0u8; 6];
		unknown.copy_from_slice(&data[6..12]);
		let header = ImageHeader {
			queue_num: be::u16_at(&data, 0, t)?,
			width: be::u16_at(&data, 2, t)?,
			height: be::u16_at(&data, 4, t)?,
			unknown,
			compression: data[0x0C],
		};

		if header.queue_num > 1 {
			return Err(BoltError::corrupt(
				t,
				format!("image has queue number {} instead of 0 or 1", header.queue_num),
			));
		}

		Ok(Self {
			header,
			data,
		})
	}

	/// Pixel encoding
	pub fn encoding(&self) -> ImageEncoding {
		if self.header.compression != 0 {
			ImageEncoding::Rl7
		} else {
			ImageEncoding::Clut7
		}
	}

	/// The 128 RGB triples of the plane palette
	pub fn palette(&self) -> &[u8] {
		&self.data[IMAGE_HEADER_SIZE..IMAGE_HEADER_SIZE + IMAGE_PALETTE_SIZE]
	}

	/// Encoded pixel data
	pub fn pixels(&self) -> &[u8] {
		&self.data[IMAGE_HEADER_SIZE + IMAGE_PALETTE_SIZE..]
	}

	/// Builds an image buffer
	pub fn build(
		queue_num: u16,
		width: u16,
		height: u16,
		encoding: ImageEncoding,
		palette: &[u8],
		pixels: &[u8],
	) -> Vec<u8> {
		let mut out = Vec::with_capacity(IMAGE_HEADER_SIZE + IMAGE_PALETTE_SIZE + pixels.len());
		out.extend_from_slice(&queue_num.to_be_bytes());
		out.extend_from_slice(&width.to_be_bytes());
		out.extend_from_slice(&height.to_be_bytes());
		out.extend_from_slice(&[128, 0, 0, 0, 0, 0]);
		out.push(u8::from(encoding == ImageEncoding::Rl7));

		let mut full_palette = [0u8; IMAGE_PALETTE_SIZE];
		let n = palette.len().min(IMAGE_PALETTE_SIZE);
		full_palette[..n].copy_from_slice(&palette[..n]);
		out.extend_from_slice(&full_palette);
		out.extend_from_slice(pixels);
		out
	}
}
