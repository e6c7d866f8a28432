//! Construction and serialization of `BOLTLIB` containers.
//!
//! Used by packing tools and by tests that need containers in memory.

use std::io::{Cursor, Write};
use std::path::Path;

use crate::file::BoltError;

use super::File;
use super::constants::{DIRECTORY_ENTRY_SIZE, HEADER_SIZE, RESOURCE_ENTRY_SIZE};
use super::entry::{Compression, DirectoryEntry, Header, ResourceEntry};
use super::id::BltShortId;
use super::lz;

#[derive(Debug, Clone)]
struct PendingResource {
	resource_type: u32,
	compression: Compression,
	size: u32,
	stored: Vec<u8>,
}

/// Builder for `BOLTLIB` containers
///
/// # Examples
///
/// ```
/// use bolt_types::file::boltlib::{BltType, Builder, Compression};
///
/// let mut builder = Builder::new();
/// let dir = builder.add_directory();
/// let id = builder.add_resource(dir, BltType::U8Values, Compression::Lz, &[7; 64]).unwrap();
///
/// let mut file = builder.build_file().unwrap();
/// assert_eq!(file.load_resource(id.into(), BltType::U8Values).unwrap(), vec![7; 64]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
	directories: Vec<Vec<PendingResource>>,
}

impl Builder {
	/// Creates an empty builder
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an empty directory and returns its number
	///
	/// # Panics
	///
	/// Panics when more than 256 directories are added.
	pub fn add_directory(&mut self) -> u8 {
		assert!(self.directories.len() < 256, "a container holds at most 256 directories");
		self.directories.push(Vec::new());
		(self.directories.len() - 1) as u8
	}

	/// Appends a resource to `dir` and returns its id
	///
	/// Data is compressed with the reference BOLT-LZ encoder when
	/// `compression` is [`Compression::Lz`].
	pub fn add_resource(
		&mut self,
		dir: u8,
		resource_type: impl Into<u32>,
		compression: Compression,
		data: &[u8],
	) -> Result<BltShortId, BoltError> {
		let count = self.directories.len();
		let Some(resources) = self.directories.get_mut(dir as usize) else {
			return Err(BoltError::DirectoryOutOfRange {
				id: u32::from(dir) << 24,
				dir,
				count,
			});
		};
		if resources.len() >= 256 {
			return Err(BoltError::ResourceOutOfRange {
				id: u32::from(dir) << 24,
				res: u8::MAX,
				count: resources.len(),
			});
		}

		let stored = match compression {
			Compression::Lz => lz::compress(data),
			Compression::Raw => data.to_vec(),
		};
		resources.push(PendingResource {
			resource_type: resource_type.into(),
			compression,
			size: data.len() as u32,
			stored,
		});

		Ok(BltShortId::new(dir, (resources.len() - 1) as u8))
	}

	/// Serializes the container
	///
	/// Layout: header, directory entries, every resource table, then the
	/// resource data in directory order. Each directory's compressed read
	/// size is the largest compressed resource it holds.
	pub fn to_bytes(&self) -> Vec<u8> {
		let tables_start = HEADER_SIZE + self.directories.len() * DIRECTORY_ENTRY_SIZE;
		let tables_size: usize =
			self.directories.iter().map(|d| d.len() * RESOURCE_ENTRY_SIZE).sum();

		let mut directory_entries = Vec::with_capacity(self.directories.len());
		let mut resource_entries = Vec::new();
		let mut data = Vec::new();
		let mut table_offset = tables_start;
		let mut data_offset = tables_start + tables_size;

		for resources in &self.directories {
			let comp_read_size = resources
				.iter()
				.filter(|r| r.compression == Compression::Lz)
				.map(|r| r.stored.len())
				.max()
				.unwrap_or(0);

			directory_entries.push(DirectoryEntry {
				num_resources: resources.len() as u32,
				comp_read_size: comp_read_size as u32,
				table_offset: table_offset as u32,
			});
			table_offset += resources.len() * RESOURCE_ENTRY_SIZE;

			for resource in resources {
				resource_entries.push(ResourceEntry {
					compression_tag: resource.compression.tag(),
					resource_type: resource.resource_type,
					size: resource.size,
					offset: data_offset as u32,
				});
				data.extend_from_slice(&resource.stored);
				data_offset += resource.stored.len();
			}
		}

		let header = Header {
			num_dirs: self.directories.len() as u8,
			file_size: data_offset as u32,
		};

		let mut bytes = Vec::with_capacity(data_offset);
		bytes.extend_from_slice(&header.to_bytes());
		for entry in &directory_entries {
			bytes.extend_from_slice(&entry.to_bytes());
		}
		for entry in &resource_entries {
			bytes.extend_from_slice(&entry.to_bytes());
		}
		bytes.extend_from_slice(&data);
		bytes
	}

	/// Writes the container to `writer`
	pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), BoltError> {
		writer.write_all(&self.to_bytes())?;
		Ok(())
	}

	/// Writes the container to a file at `path`
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BoltError> {
		let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
		self.write_to(&mut writer)?;
		writer.flush()?;
		Ok(())
	}

	/// Serializes the container and opens it from memory
	pub fn build_file(&self) -> Result<File<Cursor<Vec<u8>>>, BoltError> {
		File::from_reader(Cursor::new(self.to_bytes()))
	}
}
