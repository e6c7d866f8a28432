//! Unit tests for BOLTLIB container operations

use std::cell::Cell;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::rc::Rc;

use super::*;
use crate::file::BoltError;

/// Reader that counts bytes read, shared with the test through an `Rc`
struct CountingReader {
	inner: Cursor<Vec<u8>>,
	bytes_read: Rc<Cell<usize>>,
}

impl Read for CountingReader {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let n = self.inner.read(buf)?;
		self.bytes_read.set(self.bytes_read.get() + n);
		Ok(n)
	}
}

impl Seek for CountingReader {
	fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
		self.inner.seek(pos)
	}
}

fn sample_builder() -> (Builder, BltShortId, BltShortId, BltShortId) {
	let mut builder = Builder::new();
	let dir0 = builder.add_directory();
	let dir1 = builder.add_directory();

	let text: Vec<u8> = b"the quick brown fox ".iter().copied().cycle().take(400).collect();
	let raw = builder.add_resource(dir0, BltType::U8Values, Compression::Raw, b"raw bytes").unwrap();
	let lz = builder.add_resource(dir1, BltType::Sound, Compression::Lz, &text).unwrap();
	let fill = builder.add_resource(dir1, BltType::Palette, Compression::Lz, &[0x33; 390]).unwrap();

	(builder, raw, lz, fill)
}

#[test]
fn test_header_and_directories() {
	let (builder, ..) = sample_builder();
	let bytes = builder.to_bytes();
	let file = File::from_reader(Cursor::new(bytes.clone())).unwrap();

	assert_eq!(file.header().num_dirs, 2);
	assert_eq!(file.header().file_size as usize, bytes.len());
	assert_eq!(file.directories().len(), 2);
	assert_eq!(file.directories()[0].num_resources, 1);
	assert_eq!(file.directories()[1].num_resources, 2);
	assert!(!file.is_table_loaded(0));
	assert!(!file.is_table_loaded(1));
}

#[test]
fn test_invalid_magic() {
	let mut bytes = sample_builder().0.to_bytes();
	bytes[0..4].copy_from_slice(b"TLOB");
	let err = File::from_reader(Cursor::new(bytes)).unwrap_err();
	assert!(matches!(err, BoltError::InvalidMagic { .. }));
}

#[test]
fn test_truncated_directory_table() {
	let bytes = sample_builder().0.to_bytes();
	let err = File::from_reader(Cursor::new(bytes[..20].to_vec())).unwrap_err();
	assert!(matches!(err, BoltError::Io(_)));
}

#[test]
fn test_load_raw_and_compressed() {
	let (builder, raw, lz, fill) = sample_builder();
	let mut file = builder.build_file().unwrap();

	assert_eq!(file.load_resource(raw.into(), BltType::U8Values).unwrap(), b"raw bytes");

	let text = file.load_resource(lz.into(), BltType::Sound).unwrap();
	assert_eq!(text.len(), 400);
	assert!(text.starts_with(b"the quick brown fox the"));

	assert_eq!(file.load_resource(fill.into(), BltType::Palette).unwrap(), vec![0x33; 390]);
}

#[test]
fn test_compressed_read_at_end_of_file() {
	// The last resource is shorter than the directory's read size
	let mut builder = Builder::new();
	let dir = builder.add_directory();
	let noisy: Vec<u8> = (0..200u32).map(|i| (i * 97 % 251) as u8).collect();
	builder.add_resource(dir, BltType::U8Values, Compression::Lz, &noisy).unwrap();
	let last = builder.add_resource(dir, BltType::U8Values, Compression::Lz, &[1; 16]).unwrap();

	let mut file = builder.build_file().unwrap();
	assert!(file.directories()[0].comp_read_size > 16);
	assert_eq!(file.load_resource(last.into(), BltType::U8Values).unwrap(), vec![1; 16]);
}

#[test]
fn test_lazy_load_idempotence() {
	let (builder, _, lz, _) = sample_builder();
	let bytes_read = Rc::new(Cell::new(0));
	let reader = CountingReader {
		inner: Cursor::new(builder.to_bytes()),
		bytes_read: bytes_read.clone(),
	};
	let mut file = File::from_reader(reader).unwrap();
	let after_open = bytes_read.get();
	assert!(!file.is_table_loaded(1));

	let first = file.load_resource(lz.into(), BltType::Sound).unwrap();
	assert!(file.is_table_loaded(1));
	assert!(!file.is_table_loaded(0));
	let first_load = bytes_read.get() - after_open;

	let second = file.load_resource(lz.into(), BltType::Sound).unwrap();
	let second_load = bytes_read.get() - after_open - first_load;

	assert_eq!(first, second);
	// The second load skips the two-entry resource table
	assert_eq!(first_load - second_load, 2 * 16);
}

#[test_log::test]
fn test_type_mismatch() {
	let (builder, raw, ..) = sample_builder();
	let mut file = builder.build_file().unwrap();

	let err = file.load_resource(raw.into(), BltType::Image).unwrap_err();
	assert!(matches!(
		err,
		BoltError::TypeMismatch {
			expected: 8,
			actual: 1,
			..
		}
	));
	assert!(err.is_corrupt_asset());
}

#[test]
fn test_id_validation() {
	let (builder, ..) = sample_builder();
	let mut file = builder.build_file().unwrap();

	let err = file.load_resource(BltId::INVALID, BltType::U8Values).unwrap_err();
	assert!(matches!(err, BoltError::InvalidId(_)));

	let err = file.load_resource(BltId(0x0000_0004), BltType::U8Values).unwrap_err();
	assert!(matches!(
		err,
		BoltError::NonZeroOffset {
			offset: 4,
			..
		}
	));

	let err = file.load_resource(BltShortId::new(5, 0).into(), BltType::U8Values).unwrap_err();
	assert!(matches!(
		err,
		BoltError::DirectoryOutOfRange {
			dir: 5,
			count: 2,
			..
		}
	));

	let err = file.load_resource(BltShortId::new(0, 3).into(), BltType::U8Values).unwrap_err();
	assert!(matches!(
		err,
		BoltError::ResourceOutOfRange {
			res: 3,
			count: 1,
			..
		}
	));
}

#[test_log::test]
fn test_unknown_compression() {
	let (builder, raw, ..) = sample_builder();
	let mut bytes = builder.to_bytes();

	// First resource entry of directory 0 follows the two directory entries
	let table_offset = 16 + 2 * 16;
	bytes[table_offset] = 3;

	let mut file = File::from_reader(Cursor::new(bytes)).unwrap();
	let err = file.load_resource(raw.into(), BltType::U8Values).unwrap_err();
	assert!(matches!(err, BoltError::UnknownCompression(3)));
}

#[test]
fn test_resource_entry_layout() {
	let entry = ResourceEntry {
		compression_tag: 8,
		resource_type: 0x1A,
		size: 0x100,
		offset: 0x2000,
	};
	let bytes = entry.to_bytes();
	assert_eq!(&bytes[0..4], &[0x08, 0x00, 0x00, 0x1A]);
	assert_eq!(ResourceEntry::from_bytes(&bytes).unwrap(), entry);
	assert_eq!(entry.compression().unwrap(), Compression::Raw);
}
