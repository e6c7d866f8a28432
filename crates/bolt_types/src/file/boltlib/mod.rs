//! `BOLTLIB` resource container
//!
//! ## File Structure
//!
//! ```text
//! +------------------------+
//! | Header (16 bytes)      |
//! +------------------------+
//! | Directory Entries      |  num_dirs * 16 bytes
//! +------------------------+
//! | Resource Tables        |  one table per directory, at table_offset
//! +------------------------+
//! | Resource Data          |  raw or BOLT-LZ compressed
//! +------------------------+
//! ```
//!
//! All fields are big-endian.
//!
//! ### Header
//!
//! | Offset | Size | Description              |
//! |--------|------|--------------------------|
//! | 0x00   | 4    | Magic `"BOLT"`           |
//! | 0x04   | 7    | Reserved                 |
//! | 0x0B   | 1    | Number of directories    |
//! | 0x0C   | 4    | Total file size          |
//!
//! ### Directory Entry
//!
//! | Offset | Size | Description                              |
//! |--------|------|------------------------------------------|
//! | 0x00   | 4    | Number of resources                      |
//! | 0x04   | 4    | Bytes read per compressed resource load  |
//! | 0x08   | 4    | Offset of the resource table             |
//! | 0x0C   | 4    | Reserved                                 |
//!
//! ### Resource Entry
//!
//! | Offset | Size | Description                                         |
//! |--------|------|-----------------------------------------------------|
//! | 0x00   | 4    | Compression (top byte: 0 = BOLT-LZ, 8 = raw) and type |
//! | 0x04   | 4    | Uncompressed size                                   |
//! | 0x08   | 4    | Offset of the resource data                         |
//! | 0x0C   | 4    | Reserved                                            |
//!
//! Resource tables are read on first access and cached for the lifetime of
//! the container. Loading a resource moves the reader's cursor.

mod builder;
mod entry;
mod file;
mod id;
pub mod lz;
mod types;

#[cfg(test)]
mod tests;

pub use builder::Builder;
pub use entry::{Compression, DirectoryEntry, Header, ResourceEntry};
pub use file::File;
pub use id::{BltId, BltShortId};
pub use types::BltType;

mod constants {
	/// Magic tag at the start of every container
	pub const MAGIC: &[u8; 4] = b"BOLT";

	/// Size of the file header
	pub const HEADER_SIZE: usize = 16;

	/// Size of a directory entry
	pub const DIRECTORY_ENTRY_SIZE: usize = 16;

	/// Size of a resource entry
	pub const RESOURCE_ENTRY_SIZE: usize = 16;

	/// Compression tag for BOLT-LZ data
	pub const COMPRESSION_LZ: u8 = 0;

	/// Compression tag for uncompressed data
	pub const COMPRESSION_RAW: u8 = 8;
}
