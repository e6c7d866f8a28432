//! Queue 4 cel sequence buffers
//!
//! A cel sequence holds RL7 foreground frames plus a control stream that
//! swaps backgrounds, loads foreground palettes and scrolls the camera as
//! the frames play.
//!
//! ## Header (0x14 bytes)
//!
//! | Offset | Size | Description                   |
//! |--------|------|-------------------------------|
//! | 0x00   | 2    | Queue number, always 4        |
//! | 0x02   | 2    | Width                         |
//! | 0x04   | 2    | Height                        |
//! | 0x06   | 2    | Number of frames              |
//! | 0x08   | 4    | Unknown                       |
//! | 0x0C   | 4    | Offset of the control stream  |
//! | 0x10   | 4    | Unknown                       |
//!
//! The frame table follows the header: one `{rl7_offset: u32, rl7_size: u32}`
//! pair per frame, offsets relative to the start of the buffer.
//!
//! ## Control Command (4 bytes + parameters)
//!
//! | Offset | Size | Description                              |
//! |--------|------|------------------------------------------|
//! | 0x00   | 1    | Cel number the command waits for         |
//! | 0x01   | 1    | Opcode                                   |
//! | 0x02   | 2    | Parameter size, not reliable and ignored |
//!
//! | Opcode | Parameters                                         |
//! |--------|----------------------------------------------------|
//! | 1      | Load background: camera x (i16), camera y (i16)    |
//! | 2      | Fore palette: count (u8), first (u8), RGB * count  |
//! | 3      | Scroll: duration (u16), speed (u8), direction (u8) |
//! | 0xFF   | Stop                                               |
//!
//! Only the Merlin command set is known.

use bytes::Bytes;
use log::{debug, warn};
use serde::Serialize;

use crate::file::{BoltError, FileType, be};

mod opcodes {
	pub const LOAD_BACK: u8 = 1;
	pub const LOAD_FORE_PALETTE: u8 = 2;
	pub const SCROLL: u8 = 3;
	pub const STOP: u8 = 0xFF;
}

/// Size of the cel sequence header
pub const CELS_HEADER_SIZE: usize = 0x14;

/// Queue number carried by cel sequences
pub const CELS_QUEUE: u16 = 4;

const FRAME_ENTRY_SIZE: usize = 8;
const CONTROL_COMMAND_SIZE: usize = 4;

/// Cel sequence header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CelsHeader {
	/// Queue number
	pub queue_num: u16,
	/// Frame width
	pub width: u16,
	/// Frame height
	pub height: u16,
	/// Number of frames
	pub num_frames: u16,
	/// Unknown
	pub unk8: u32,
	/// Offset of the control stream
	pub control_data_offset: u32,
}

impl CelsHeader {
	/// Parses a header
	pub fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		let t = FileType::Cels;
		Ok(Self {
			queue_num: be::u16_at(data, 0, t)?,
			width: be::u16_at(data, 2, t)?,
			height: be::u16_at(data, 4, t)?,
			num_frames: be::u16_at(data, 6, t)?,
			unk8: be::u32_at(data, 8, t)?,
			control_data_offset: be::u32_at(data, 0x0C, t)?,
		})
	}
}

/// Location of one RL7 frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CelFrame {
	/// Offset from the start of the buffer
	pub rl7_offset: u32,
	/// Size of the RL7 data
	pub rl7_size: u32,
}

/// Decoded control operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CelOp {
	/// Fetch a queue 1 background and place the camera
	LoadBack {
		/// Camera x
		camera_x: i16,
		/// Camera y
		camera_y: i16,
	},
	/// Set part of the foreground palette
	LoadForePalette {
		/// First color index
		first: u8,
		/// RGB triples
		colors: Vec<u8>,
	},
	/// Start a linear camera scroll
	Scroll {
		/// Duration in cel steps
		duration: u16,
		/// Pixels per step
		speed: u8,
		/// 0 left, 1 right, 2 up, 3 down
		direction: u8,
	},
}

/// One control command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CelCommand {
	/// Cel number the command waits for
	pub cel_number: u8,
	/// Operation
	pub op: CelOp,
}

/// Decoded cel sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CelSequence {
	/// Header
	pub header: CelsHeader,
	/// Frame table
	pub frames: Vec<CelFrame>,
	/// Control commands up to the first stop command
	pub commands: Vec<CelCommand>,
	#[serde(skip)]
	data: Bytes,
}

impl CelSequence {
	/// Decodes a queue 4 buffer
	///
	/// The control stream is decoded up to its first stop command. A stream
	/// that runs out of data first is treated as stopped, with a warning.
	pub fn from_bytes(data: Bytes) -> Result<Self, BoltError> {
		let t = FileType::Cels;
		let header = CelsHeader::from_bytes(&data)?;
		if header.queue_num != CELS_QUEUE {
			return Err(BoltError::corrupt(
				t,
				format!("cel sequence has queue number {} instead of 4", header.queue_num),
			));
		}

		debug!(
			"Loading cels width {}, height {}, numFrames {}, unk8 {}",
			header.width, header.height, header.num_frames, header.unk8
		);

		let frames = (0..header.num_frames as usize)
			.map(|i| {
				let at = CELS_HEADER_SIZE + i * FRAME_ENTRY_SIZE;
				Ok(CelFrame {
					rl7_offset: be::u32_at(&data, at, t)?,
					rl7_size: be::u32_at(&data, at + 4, t)?,
				})
			})
			.collect::<Result<Vec<_>, BoltError>>()?;

		let commands = decode_commands(&data, header.control_data_offset as usize)?;

		Ok(Self {
			header,
			frames,
			commands,
			data,
		})
	}

	/// RL7 data of a frame
	///
	/// A size running past the buffer is clamped to the buffer end.
	pub fn frame_data(&self, frame: usize) -> Result<&[u8], BoltError> {
		let Some(entry) = self.frames.get(frame) else {
			return Err(BoltError::corrupt(
				FileType::Cels,
				format!("cel frame {frame} of {}", self.frames.len()),
			));
		};
		let start = entry.rl7_offset as usize;
		if start > self.data.len() {
			return Err(BoltError::insufficient_data(FileType::Cels, start, self.data.len()));
		}
		let end = (start + entry.rl7_size as usize).min(self.data.len());
		Ok(&self.data[start..end])
	}
}

fn decode_commands(data: &[u8], mut cursor: usize) -> Result<Vec<CelCommand>, BoltError> {
	let t = FileType::Cels;
	let mut commands = Vec::new();

	loop {
		if cursor + CONTROL_COMMAND_SIZE > data.len() {
			warn!("Cel control stream ended without a stop command at 0x{cursor:X}");
			break;
		}

		let cel_number = data[cursor];
		let opcode = data[cursor + 1];
		let params = cursor + CONTROL_COMMAND_SIZE;

		let (op, size) = match opcode {
			opcodes::LOAD_BACK => (
				CelOp::LoadBack {
					camera_x: be::i16_at(data, params, t)?,
					camera_y: be::i16_at(data, params + 2, t)?,
				},
				4,
			),
			opcodes::LOAD_FORE_PALETTE => {
				let num = be::u8_at(data, params, t)? as usize;
				let first = be::u8_at(data, params + 1, t)?;
				let colors = data
					.get(params + 2..params + 2 + num * 3)
					.ok_or_else(|| BoltError::insufficient_data(t, params + 2 + num * 3, data.len()))?;
				(
					CelOp::LoadForePalette {
						first,
						colors: colors.to_vec(),
					},
					2 + num * 3,
				)
			}
			opcodes::SCROLL => (
				CelOp::Scroll {
					duration: be::u16_at(data, params, t)?,
					speed: be::u8_at(data, params + 2, t)?,
					direction: be::u8_at(data, params + 3, t)?,
				},
				4,
			),
			opcodes::STOP => break,
			other => {
				return Err(BoltError::corrupt(t, format!("unknown cel command 0x{other:X} at 0x{cursor:X}")));
			}
		};

		commands.push(CelCommand {
			cel_number,
			op,
		});
		cursor = params + size;
	}

	Ok(commands)
}

/// Builder for queue 4 buffers
#[derive(Debug, Clone)]
pub struct CelSequenceBuilder {
	width: u16,
	height: u16,
	frames: Vec<Vec<u8>>,
	control: Vec<u8>,
}

impl CelSequenceBuilder {
	/// Creates an empty sequence of the given frame size
	pub fn new(width: u16, height: u16) -> Self {
		Self {
			width,
			height,
			frames: Vec::new(),
			control: Vec::new(),
		}
	}

	/// Appends an RL7 frame
	pub fn frame(mut self, rl7: &[u8]) -> Self {
		self.frames.push(rl7.to_vec());
		self
	}

	/// Appends a control command
	pub fn command(mut self, command: &CelCommand) -> Self {
		self.control.push(command.cel_number);
		match &command.op {
			CelOp::LoadBack {
				camera_x,
				camera_y,
			} => {
				self.control.extend_from_slice(&[opcodes::LOAD_BACK, 0, 4]);
				self.control.extend_from_slice(&camera_x.to_be_bytes());
				self.control.extend_from_slice(&camera_y.to_be_bytes());
			}
			CelOp::LoadForePalette {
				first,
				colors,
			} => {
				let num = (colors.len() / 3) as u8;
				let size = 2 + u16::from(num) * 3;
				self.control.push(opcodes::LOAD_FORE_PALETTE);
				self.control.extend_from_slice(&size.to_be_bytes());
				self.control.extend_from_slice(&[num, *first]);
				self.control.extend_from_slice(&colors[..num as usize * 3]);
			}
			CelOp::Scroll {
				duration,
				speed,
				direction,
			} => {
				self.control.extend_from_slice(&[opcodes::SCROLL, 0, 4]);
				self.control.extend_from_slice(&duration.to_be_bytes());
				self.control.extend_from_slice(&[*speed, *direction]);
			}
		}
		self
	}

	/// Serializes the buffer, closing the control stream with a stop command
	pub fn to_bytes(&self) -> Vec<u8> {
		let table_end = CELS_HEADER_SIZE + self.frames.len() * FRAME_ENTRY_SIZE;
		let frames_size: usize = self.frames.iter().map(Vec::len).sum();
		let control_offset = table_end + frames_size;

		let mut out = Vec::with_capacity(control_offset + self.control.len() + CONTROL_COMMAND_SIZE);
		out.extend_from_slice(&CELS_QUEUE.to_be_bytes());
		out.extend_from_slice(&self.width.to_be_bytes());
		out.extend_from_slice(&self.height.to_be_bytes());
		out.extend_from_slice(&(self.frames.len() as u16).to_be_bytes());
		out.extend_from_slice(&0u32.to_be_bytes());
		out.extend_from_slice(&(control_offset as u32).to_be_bytes());
		out.extend_from_slice(&0u32.to_be_bytes());

		let mut offset = table_end;
		for frame in &self.frames {
			out.extend_from_slice(&(offset as u32).to_be_bytes());
			out.extend_from_slice(&(frame.len() as u32).to_be_bytes());
			offset += frame.len();
		}
		for frame in &self.frames {
			out.extend_from_slice(frame);
		}
		out.extend_from_slice(&self.control);
		out.extend_from_slice(&[0, opcodes::STOP, 0, 0]);
		out
	}
}
