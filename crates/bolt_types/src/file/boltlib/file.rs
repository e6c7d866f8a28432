//! Core file operations for `BOLTLIB` containers.

use std::io::{Read, Seek, SeekFrom};

use log::{debug, error};

use crate::file::{BoltError, FileType};

use super::constants::{DIRECTORY_ENTRY_SIZE, HEADER_SIZE, RESOURCE_ENTRY_SIZE};
use super::entry::{Compression, DirectoryEntry, Header, ResourceEntry};
use super::id::BltId;
use super::lz;

/// Open `BOLTLIB` container
#[derive(Debug)]
pub struct File<R> {
	reader: R,
	header: Header,
	directories: Vec<DirectoryEntry>,
	/// Resource tables, parsed on first access
	tables: Vec<Option<Vec<ResourceEntry>>>,
}

impl<R: Read + Seek> File<R> {
	/// Reads the header and directory entries from the given reader
	///
	/// Resource tables are not read until a resource in their directory is
	/// requested.
	pub fn from_reader(mut reader: R) -> Result<Self, BoltError> {
		reader.seek(SeekFrom::Start(0))?;

		let mut header_bytes = [0u8; HEADER_SIZE];
		reader.read_exact(&mut header_bytes)?;
		let header = Header::from_bytes(&header_bytes)?;

		let mut directories = Vec::with_capacity(header.num_dirs as usize);
		let mut entry_bytes = [0u8; DIRECTORY_ENTRY_SIZE];
		for _ in 0..header.num_dirs {
			reader.read_exact(&mut entry_bytes)?;
			directories.push(DirectoryEntry::from_bytes(&entry_bytes)?);
		}

		debug!("BOLTLIB opened: {} directories, file size {}", header.num_dirs, header.file_size);

		Ok(Self {
			reader,
			header,
			tables: vec![None; directories.len()],
			directories,
		})
	}

	/// Container header
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Directory entries in file order
	pub fn directories(&self) -> &[DirectoryEntry] {
		&self.directories
	}

	/// Returns true once the resource table of `dir` has been read
	pub fn is_table_loaded(&self, dir: u8) -> bool {
		matches!(self.tables.get(dir as usize), Some(Some(_)))
	}

	/// Returns the resource table of `dir`, reading it on first access
	pub fn resource_table(&mut self, dir: u8) -> Result<&[ResourceEntry], BoltError> {
		let index = dir as usize;
		let Some(directory) = self.directories.get(index).copied() else {
			return Err(BoltError::DirectoryOutOfRange {
				id: u32::from(dir) << 24,
				dir,
				count: self.directories.len(),
			});
		};

		if self.tables[index].is_none() {
			debug!(
				"Loading resource table of directory {dir}: {} entries at 0x{:08X}",
				directory.num_resources, directory.table_offset
			);

			self.reader.seek(SeekFrom::Start(u64::from(directory.table_offset)))?;
			let mut table_bytes = vec![0u8; directory.num_resources as usize * RESOURCE_ENTRY_SIZE];
			self.reader.read_exact(&mut table_bytes)?;

			let table = table_bytes
				.chunks_exact(RESOURCE_ENTRY_SIZE)
				.map(ResourceEntry::from_bytes)
				.collect::<Result<Vec<_>, _>>()?;
			self.tables[index] = Some(table);
		}

		Ok(self.tables[index].as_deref().unwrap_or_default())
	}

	/// Looks up the resource entry addressed by `id`
	pub fn resource_entry(&mut self, id: BltId) -> Result<ResourceEntry, BoltError> {
		if !id.is_valid() {
			return Err(BoltError::InvalidId(id.0));
		}
		if id.offset() != 0 {
			return Err(BoltError::NonZeroOffset {
				id: id.0,
				offset: id.offset(),
			});
		}

		let short = id.short_id();
		let (dir, res) = (short.dir(), short.res());
		if dir as usize >= self.directories.len() {
			return Err(BoltError::DirectoryOutOfRange {
				id: id.0,
				dir,
				count: self.directories.len(),
			});
		}

		let table = self.resource_table(dir)?;
		table.get(res as usize).copied().ok_or(BoltError::ResourceOutOfRange {
			id: id.0,
			res,
			count: table.len(),
		})
	}

	/// Loads and decompresses the resource addressed by `id`
	///
	/// The stored type must equal `expected_type` exactly. The returned
	/// buffer always has the uncompressed size recorded in the resource
	/// entry. Failures are logged before being returned.
	pub fn load_resource(
		&mut self,
		id: BltId,
		expected_type: impl Into<u32>,
	) -> Result<Vec<u8>, BoltError> {
		let expected_type = expected_type.into();
		self.read_resource(id, expected_type).inspect_err(|e| {
			error!("Failed to load resource {id} of type {expected_type}: {e}");
		})
	}

	fn read_resource(&mut self, id: BltId, expected_type: u32) -> Result<Vec<u8>, BoltError> {
		let entry = self.resource_entry(id)?;

		if entry.resource_type != expected_type {
			return Err(BoltError::TypeMismatch {
				id: id.0,
				expected: expected_type,
				actual: entry.resource_type,
			});
		}

		let compression = entry.compression()?;
		let size = entry.size as usize;
		self.reader.seek(SeekFrom::Start(u64::from(entry.offset)))?;

		match compression {
			Compression::Raw => {
				let mut data = vec![0u8; size];
				self.reader.read_exact(&mut data)?;
				Ok(data)
			}
			Compression::Lz => {
				let read_size = self.directories[id.short_id().dir() as usize].comp_read_size;

				// The last resources in a file may have fewer bytes available
				// than the directory's read size.
				let mut compressed = Vec::with_capacity(read_size as usize);
				(&mut self.reader).take(u64::from(read_size)).read_to_end(&mut compressed)?;

				lz::decompress_to_vec(&compressed, size)
			}
		}
	}

	/// Consumes the container and returns the underlying reader
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl File<std::io::BufReader<std::fs::File>> {
	/// Opens a `BOLTLIB` container from the given path
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, BoltError> {
		let path = path.as_ref();
		let file = std::fs::File::open(path).inspect_err(|e| {
			error!("Failed to open {}: {e}", path.display());
		})?;
		let reader = std::io::BufReader::new(file);
		Self::from_reader(reader).inspect_err(|e| {
			error!("Failed to read {} as {}: {e}", path.display(), FileType::Boltlib);
		})
	}
}
