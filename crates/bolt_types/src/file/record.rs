//! Typed records stored in `BOLTLIB` resources.
//!
//! Simple resources are either a single fixed-size record or a packed array
//! of records. [`BltRecord`] describes the layout; [`boltlib::File::load_record`]
//! and [`boltlib::File::load_record_array`] do the loading and size checks.
//!
//! [`boltlib::File::load_record`]: crate::file::boltlib::File::load_record
//! [`boltlib::File::load_record_array`]: crate::file::boltlib::File::load_record_array

use std::io::{Read, Seek};

use serde::Serialize;

use crate::file::boltlib::{self, BltId, BltType};
use crate::file::{BoltError, FileType, be};

/// Fixed-size record stored in a typed resource
pub trait BltRecord: Sized {
	/// Resource type holding this record
	const TYPE: BltType;

	/// Size of one record in bytes
	const SIZE: usize;

	/// Parses one record from the start of `data`
	fn from_bytes(data: &[u8]) -> Result<Self, BoltError>;
}

impl<R: Read + Seek> boltlib::File<R> {
	/// Loads a resource holding exactly one `T`
	pub fn load_record<T: BltRecord>(&mut self, id: BltId) -> Result<T, BoltError> {
		let data = self.load_resource(id, T::TYPE)?;
		if data.len() != T::SIZE {
			return Err(BoltError::corrupt(
				FileType::Boltlib,
				format!("resource {id} of type {} has size {} instead of {}", T::TYPE, data.len(), T::SIZE),
			));
		}
		T::from_bytes(&data)
	}

	/// Loads a resource holding a packed array of `T`
	///
	/// Trailing bytes that do not fill a whole record are ignored.
	pub fn load_record_array<T: BltRecord>(&mut self, id: BltId) -> Result<Vec<T>, BoltError> {
		let data = self.load_resource(id, T::TYPE)?;
		data.chunks_exact(T::SIZE).map(T::from_bytes).collect()
	}
}

/// Element of an unsigned byte list (type 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct U8Value(pub u8);

impl BltRecord for U8Value {
	const TYPE: BltType = BltType::U8Values;
	const SIZE: usize = 1;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		Ok(Self(be::u8_at(data, 0, FileType::Boltlib)?))
	}
}

/// Element of a signed 16-bit list (type 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct S16Value(pub i16);

impl BltRecord for S16Value {
	const TYPE: BltType = BltType::S16Values;
	const SIZE: usize = 2;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		Ok(Self(be::i16_at(data, 0, FileType::Boltlib)?))
	}
}

/// Element of an unsigned 16-bit list (type 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct U16Value(pub u16);

impl BltRecord for U16Value {
	const TYPE: BltType = BltType::U16Values;
	const SIZE: usize = 2;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		Ok(Self(be::u16_at(data, 0, FileType::Boltlib)?))
	}
}

/// Element of a resource list (type 6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceRef(pub BltId);

impl BltRecord for ResourceRef {
	const TYPE: BltType = BltType::ResourceList;
	const SIZE: usize = 4;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		Ok(Self(BltId(be::u32_at(data, 0, FileType::Boltlib)?)))
	}
}

/// Inclusive rectangle (type 24)
///
/// Stored as left, right, top, bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
	/// Left edge
	pub left: i16,
	/// Right edge, inclusive
	pub right: i16,
	/// Top edge
	pub top: i16,
	/// Bottom edge, inclusive
	pub bottom: i16,
}

impl Rect {
	/// Returns true when the point lies inside the rectangle, edges included
	pub fn contains(&self, x: i32, y: i32) -> bool {
		(i32::from(self.left)..=i32::from(self.right)).contains(&x)
			&& (i32::from(self.top)..=i32::from(self.bottom)).contains(&y)
	}

	/// Width of the rectangle, edges included
	pub fn width(&self) -> i32 {
		i32::from(self.right) - i32::from(self.left) + 1
	}

	/// Height of the rectangle, edges included
	pub fn height(&self) -> i32 {
		i32::from(self.bottom) - i32::from(self.top) + 1
	}
}

impl BltRecord for Rect {
	const TYPE: BltType = BltType::Rect;
	const SIZE: usize = 8;

	fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		Ok(Self {
			left: be::i16_at(data, 0, FileType::Boltlib)?,
			right: be::i16_at(data, 2, FileType::Boltlib)?,
			top: be::i16_at(data, 4, FileType::Boltlib)?,
			bottom: be::i16_at(data, 6, FileType::Boltlib)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::boltlib::{Builder, Compression};

	#[test]
	fn test_value_lists() {
		let mut builder = Builder::new();
		let dir = builder.add_directory();
		let bytes = builder.add_resource(dir, BltType::U8Values, Compression::Raw, &[1, 2, 3]).unwrap();
		let signed = builder
			.add_resource(dir, BltType::S16Values, Compression::Lz, &[0xFF, 0xFE, 0x00, 0x05, 0x01])
			.unwrap();
		let ids = builder
			.add_resource(dir, BltType::ResourceList, Compression::Raw, &[0x9D, 0x01, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF])
			.unwrap();

		let mut file = builder.build_file().unwrap();

		let values: Vec<U8Value> = file.load_record_array(bytes.into()).unwrap();
		assert_eq!(values, [U8Value(1), U8Value(2), U8Value(3)]);

		// The odd trailing byte is ignored
		let values: Vec<S16Value> = file.load_record_array(signed.into()).unwrap();
		assert_eq!(values, [S16Value(-2), S16Value(5)]);

		let refs: Vec<ResourceRef> = file.load_record_array(ids.into()).unwrap();
		assert_eq!(refs[0].0.short_id(), boltlib::BltShortId(0x9D01));
		assert!(!refs[1].0.is_valid());
	}

	#[test]
	fn test_single_record_size_check() {
		let mut builder = Builder::new();
		let dir = builder.add_directory();
		let rect = builder
			.add_resource(dir, BltType::Rect, Compression::Raw, &[0, 10, 0, 20, 0, 30, 0, 40])
			.unwrap();
		let short = builder.add_resource(dir, BltType::Rect, Compression::Raw, &[0, 10]).unwrap();

		let mut file = builder.build_file().unwrap();
		let loaded: Rect = file.load_record(rect.into()).unwrap();
		assert_eq!(
			loaded,
			Rect {
				left: 10,
				right: 20,
				top: 30,
				bottom: 40,
			}
		);
		assert!(loaded.contains(20, 40));
		assert!(!loaded.contains(21, 40));
		assert_eq!(loaded.width(), 11);

		let err = file.load_record::<Rect>(short.into()).unwrap_err();
		assert!(err.is_corrupt_asset());
	}
}
