//! Construction of `PF` files and movie packet streams.

use super::constants::MOVIE_ENTRY_SIZE;
use super::{PacketHeader, PacketType};

/// Builder for a movie's packet stream
///
/// # Examples
///
/// ```
/// use bolt_types::file::pf::{MovieBuilder, PacketType};
///
/// let stream = MovieBuilder::new()
///     .buffer(PacketType::Timeline, &[0; 12])
///     .split_buffer(PacketType::Audio, &[0x80; 100], &[40, 60])
///     .terminator()
///     .finish();
/// assert_eq!(stream.len(), 10 + 12 + 10 + 40 + 10 + 60 + 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MovieBuilder {
	data: Vec<u8>,
}

impl MovieBuilder {
	/// Creates an empty stream
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends one raw packet
	pub fn packet(mut self, header: PacketHeader, payload: &[u8]) -> Self {
		self.data.extend_from_slice(&header.to_bytes());
		self.data.extend_from_slice(payload);
		self
	}

	/// Appends a buffer in a single packet
	pub fn buffer(self, packet_type: PacketType, data: &[u8]) -> Self {
		self.split_buffer(packet_type, data, &[data.len()])
	}

	/// Appends a buffer split into packets of the given payload sizes
	///
	/// The sizes should add up to `data.len()`.
	pub fn split_buffer(mut self, packet_type: PacketType, data: &[u8], sizes: &[usize]) -> Self {
		let mut cursor = 0;
		for &size in sizes {
			let end = (cursor + size).min(data.len());
			self = self.packet(
				PacketHeader {
					total_size: data.len() as u32,
					partial_size: (end - cursor) as u32,
					packet_type,
					reserved: 0,
				},
				&data[cursor..end],
			);
			cursor = end;
		}
		self
	}

	/// Appends the terminator packet
	pub fn terminator(self) -> Self {
		self.packet(
			PacketHeader {
				total_size: 0,
				partial_size: 0,
				packet_type: PacketType::Terminator,
				reserved: 0,
			},
			&[],
		)
	}

	/// Returns the stream bytes
	pub fn finish(self) -> Vec<u8> {
		self.data
	}
}

/// Builder for `PF` files
#[derive(Debug, Clone, Default)]
pub struct Builder {
	movies: Vec<(u32, Vec<u8>)>,
}

impl Builder {
	/// Creates an empty file
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a movie stream under a four character code
	pub fn add_movie(&mut self, name: u32, stream: Vec<u8>) -> &mut Self {
		self.movies.push((name, stream));
		self
	}

	/// Serializes the directory followed by every stream
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut offset = 4 + self.movies.len() * MOVIE_ENTRY_SIZE;
		let mut bytes = Vec::with_capacity(offset + self.movies.iter().map(|m| m.1.len()).sum::<usize>());

		bytes.extend_from_slice(&(self.movies.len() as u32).to_be_bytes());
		for (name, stream) in &self.movies {
			bytes.extend_from_slice(&name.to_be_bytes());
			bytes.extend_from_slice(&(offset as u32).to_be_bytes());
			offset += stream.len();
		}
		for (_, stream) in &self.movies {
			bytes.extend_from_slice(stream);
		}
		bytes
	}
}
