//! Movie directory of `PF` files.

use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::{debug, warn};
use serde::Serialize;

use crate::file::{BoltError, FileType};

use super::constants::MOVIE_ENTRY_SIZE;
use super::fourcc_to_string;

/// Where the bytes of a PF file come from
///
/// Every movie gets its own reader so that a player can own its stream
/// while the directory stays available for the next movie.
pub trait PfSource {
	/// Reader over the movie packets
	type Reader: Read + 'static;

	/// Opens a reader positioned at `offset`
	fn open_at(&self, offset: u64) -> std::io::Result<Self::Reader>;
}

impl PfSource for PathBuf {
	type Reader = BufReader<std::fs::File>;

	fn open_at(&self, offset: u64) -> std::io::Result<Self::Reader> {
		let mut file = std::fs::File::open(self)?;
		file.seek(SeekFrom::Start(offset))?;
		Ok(BufReader::new(file))
	}
}

impl PfSource for Bytes {
	type Reader = Cursor<Bytes>;

	fn open_at(&self, offset: u64) -> std::io::Result<Self::Reader> {
		let mut cursor = Cursor::new(self.clone());
		cursor.set_position(offset);
		Ok(cursor)
	}
}

/// Movie directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MovieEntry {
	/// Four character code naming the movie
	pub name: u32,
	/// Offset of the first packet
	pub offset: u32,
}

impl MovieEntry {
	/// Text form of the movie name
	pub fn name_string(&self) -> String {
		fourcc_to_string(self.name)
	}
}

/// Open `PF` file
#[derive(Debug, Clone)]
pub struct File<S> {
	source: S,
	movies: Vec<MovieEntry>,
}

impl<S: PfSource> File<S> {
	/// Reads the movie directory from the source
	pub fn from_source(source: S) -> Result<Self, BoltError> {
		let mut reader = source.open_at(0)?;

		let mut count_bytes = [0u8; 4];
		reader.read_exact(&mut count_bytes)?;
		let count = u32::from_be_bytes(count_bytes) as usize;

		let mut table = Vec::new();
		reader.by_ref().take((count * MOVIE_ENTRY_SIZE) as u64).read_to_end(&mut table)?;
		if table.len() < count * MOVIE_ENTRY_SIZE {
			return Err(BoltError::insufficient_data(
				FileType::Pf,
				4 + count * MOVIE_ENTRY_SIZE,
				4 + table.len(),
			));
		}

		let movies = table
			.chunks_exact(MOVIE_ENTRY_SIZE)
			.map(|entry| MovieEntry {
				name: u32::from_be_bytes([entry[0], entry[1], entry[2], entry[3]]),
				offset: u32::from_be_bytes([entry[4], entry[5], entry[6], entry[7]]),
			})
			.collect::<Vec<_>>();

		debug!("PF directory holds {} movies", movies.len());

		Ok(Self {
			source,
			movies,
		})
	}

	/// Movies in directory order
	pub fn movies(&self) -> &[MovieEntry] {
		&self.movies
	}

	/// Looks up a movie by name
	pub fn find_movie(&self, name: u32) -> Option<&MovieEntry> {
		self.movies.iter().find(|m| m.name == name)
	}

	/// Opens a reader positioned at the first packet of the named movie
	///
	/// Returns `Ok(None)` with a warning when the movie is not listed.
	pub fn seek_movie(&self, name: u32) -> Result<Option<S::Reader>, BoltError> {
		let Some(entry) = self.find_movie(name) else {
			warn!("Movie not found: {}", fourcc_to_string(name));
			return Ok(None);
		};
		debug!("Movie {} starts at 0x{:08X}", entry.name_string(), entry.offset);
		Ok(Some(self.source.open_at(u64::from(entry.offset))?))
	}
}

impl File<PathBuf> {
	/// Opens a `PF` file from the given path
	pub fn open(path: impl AsRef<Path>) -> Result<Self, BoltError> {
		Self::from_source(path.as_ref().to_path_buf())
	}
}

impl File<Bytes> {
	/// Reads a `PF` file held in memory
	pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self, BoltError> {
		Self::from_source(data.into())
	}
}
