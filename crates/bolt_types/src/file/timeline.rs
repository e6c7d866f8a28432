//! Movie timeline buffers
//!
//! The timeline is the first buffer of every movie. It is a list of
//! commands driven frame by frame at the movie's frame period.
//!
//! ## Header (0x0C bytes)
//!
//! | Offset | Size | Description                  |
//! |--------|------|------------------------------|
//! | 0x00   | 8    | Unknown                      |
//! | 0x08   | 2    | Number of commands           |
//! | 0x0A   | 2    | Frame period in milliseconds |
//!
//! ## Command (5 bytes + parameters)
//!
//! | Offset | Size | Description                                 |
//! |--------|------|---------------------------------------------|
//! | 0x00   | 2    | Delay in frames before each firing          |
//! | 0x02   | 2    | Opcode                                      |
//! | 0x04   | 1    | Repeat count                                |
//! | 0x05   | n    | Parameters, size fixed per opcode           |
//!
//! ## Opcodes
//!
//! | Opcode | Params | Description                                          |
//! |--------|--------|------------------------------------------------------|
//! | 1      | 0      | Draw foreground from video queue 0                   |
//! | 2      | 0      | Clear foreground, draw background from video queue 1 |
//! | 12     | 8      | Start color cycle: start, plane, count, delay (i16)  |
//! | 13     | 0      | Stop color cycles                                    |
//! | 15     | 0      | Load cel sequence from video queue 4                 |
//! | 16     | 0      | Step cel sequence                                    |
//! | 19     | 4      | Fade: duration, direction (i16)                      |
//! | 0x7FFF | 4      | Movie name, ignored                                  |
//! | 0x8001 | 0      | Trigger event                                        |
//! | 0x8002 | 0      | Trigger event                                        |
//!
//! The parameter size of an unknown opcode cannot be known, so an unknown
//! opcode makes the whole timeline unreadable.

use serde::Serialize;

use crate::file::{BoltError, FileType, be};

mod opcodes {
	pub const DRAW_FORE: u16 = 1;
	pub const DRAW_BACK: u16 = 2;
	pub const START_COLOR_CYCLES: u16 = 12;
	pub const STOP_COLOR_CYCLES: u16 = 13;
	pub const START_CEL_SEQUENCE: u16 = 15;
	pub const STEP_CEL_SEQUENCE: u16 = 16;
	pub const FADE: u16 = 19;
	pub const NAME: u16 = 0x7FFF;
	pub const TRIGGER_EVENT_1: u16 = 0x8001;
	pub const TRIGGER_EVENT_2: u16 = 0x8002;
}

/// Size of the timeline header
pub const TIMELINE_HEADER_SIZE: usize = 0x0C;

/// Size of a command without its parameters
pub const TIMELINE_COMMAND_SIZE: usize = 5;

/// Parameter size of a timeline opcode, `None` when the opcode is unknown
pub fn param_size(opcode: u16) -> Option<usize> {
	match opcode {
		opcodes::DRAW_FORE
		| opcodes::DRAW_BACK
		| opcodes::STOP_COLOR_CYCLES
		| opcodes::START_CEL_SEQUENCE
		| opcodes::STEP_CEL_SEQUENCE
		| opcodes::TRIGGER_EVENT_1
		| opcodes::TRIGGER_EVENT_2 => Some(0),
		opcodes::START_COLOR_CYCLES => Some(8),
		opcodes::FADE | opcodes::NAME => Some(4),
		_ => None,
	}
}

/// Timeline header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineHeader {
	/// Number of commands
	pub num_commands: u16,
	/// Frame period in milliseconds
	pub frame_period: u16,
}

/// Decoded timeline operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimelineOp {
	/// Draw the next queue 0 image on the foreground plane
	DrawFore,
	/// Clear the foreground and draw the next queue 1 image on the background plane
	DrawBack,
	/// Start cycling `num` background colors from `start`
	StartColorCycles {
		/// First color index
		start: u16,
		/// Plane; always 1 in Merlin
		plane: u16,
		/// Number of colors
		num: u16,
		/// Step delay in milliseconds; negative cycles backwards
		delay: i16,
	},
	/// Stop every color cycle
	StopColorCycles,
	/// Load the next queue 4 cel sequence without drawing it
	StartCelSequence,
	/// Advance and draw the cel sequence by one frame
	StepCelSequence,
	/// Start a palette fade
	Fade {
		/// Duration in milliseconds
		duration: u16,
		/// 1 fades in, -1 fades out
		direction: i16,
	},
	/// Movie name metadata
	Name(u32),
	/// Notify the owner; carries the raw opcode
	TriggerEvent(u16),
}

impl TimelineOp {
	/// Decodes an opcode and its parameters
	pub fn decode(opcode: u16, params: &[u8]) -> Result<Self, BoltError> {
		let t = FileType::Timeline;
		Ok(match opcode {
			opcodes::DRAW_FORE => TimelineOp::DrawFore,
			opcodes::DRAW_BACK => TimelineOp::DrawBack,
			opcodes::START_COLOR_CYCLES => TimelineOp::StartColorCycles {
				start: be::u16_at(params, 0, t)?,
				plane: be::u16_at(params, 2, t)?,
				num: be::u16_at(params, 4, t)?,
				delay: be::i16_at(params, 6, t)?,
			},
			opcodes::STOP_COLOR_CYCLES => TimelineOp::StopColorCycles,
			opcodes::START_CEL_SEQUENCE => TimelineOp::StartCelSequence,
			opcodes::STEP_CEL_SEQUENCE => TimelineOp::StepCelSequence,
			opcodes::FADE => TimelineOp::Fade {
				duration: be::u16_at(params, 0, t)?,
				direction: be::i16_at(params, 2, t)?,
			},
			opcodes::NAME => TimelineOp::Name(be::u32_at(params, 0, t)?),
			opcodes::TRIGGER_EVENT_1 | opcodes::TRIGGER_EVENT_2 => TimelineOp::TriggerEvent(opcode),
			other => {
				return Err(BoltError::corrupt(t, format!("unknown timeline opcode 0x{other:X}")));
			}
		})
	}

	/// Raw opcode
	pub fn opcode(&self) -> u16 {
		match self {
			TimelineOp::DrawFore => opcodes::DRAW_FORE,
			TimelineOp::DrawBack => opcodes::DRAW_BACK,
			TimelineOp::StartColorCycles {
				..
			} => opcodes::START_COLOR_CYCLES,
			TimelineOp::StopColorCycles => opcodes::STOP_COLOR_CYCLES,
			TimelineOp::StartCelSequence => opcodes::START_CEL_SEQUENCE,
			TimelineOp::StepCelSequence => opcodes::STEP_CEL_SEQUENCE,
			TimelineOp::Fade {
				..
			} => opcodes::FADE,
			TimelineOp::Name(_) => opcodes::NAME,
			TimelineOp::TriggerEvent(opcode) => *opcode,
		}
	}

	fn write_params(&self, out: &mut Vec<u8>) {
		match *self {
			TimelineOp::StartColorCycles {
				start,
				plane,
				num,
				delay,
			} => {
				out.extend_from_slice(&start.to_be_bytes());
				out.extend_from_slice(&plane.to_be_bytes());
				out.extend_from_slice(&num.to_be_bytes());
				out.extend_from_slice(&delay.to_be_bytes());
			}
			TimelineOp::Fade {
				duration,
				direction,
			} => {
				out.extend_from_slice(&duration.to_be_bytes());
				out.extend_from_slice(&direction.to_be_bytes());
			}
			TimelineOp::Name(name) => out.extend_from_slice(&name.to_be_bytes()),
			_ => {}
		}
	}
}

/// One timeline command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineCommand {
	/// Frames to wait before each firing
	pub delay: u16,
	/// Number of firings
	pub reps: u8,
	/// Operation
	pub op: TimelineOp,
}

/// Fully decoded timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
	/// Header
	pub header: TimelineHeader,
	/// Commands in file order
	pub commands: Vec<TimelineCommand>,
}

impl Timeline {
	/// Decodes a timeline buffer
	///
	/// Fails on unknown opcodes and on truncated commands.
	pub fn from_bytes(data: &[u8]) -> Result<Self, BoltError> {
		let t = FileType::Timeline;
		let header = TimelineHeader {
			num_commands: be::u16_at(data, 8, t)?,
			frame_period: be::u16_at(data, 0x0A, t)?,
		};

		let mut commands = Vec::with_capacity(header.num_commands as usize);
		let mut cursor = TIMELINE_HEADER_SIZE;
		for _ in 0..header.num_commands {
			let delay = be::u16_at(data, cursor, t)?;
			let opcode = be::u16_at(data, cursor + 2, t)?;
			let reps = be::u8_at(data, cursor + 4, t)?;
			let Some(size) = param_size(opcode) else {
				return Err(BoltError::corrupt(
					t,
					format!("unknown timeline opcode 0x{opcode:X} at offset 0x{cursor:X} (unknown size)"),
				));
			};

			let params_start = cursor + TIMELINE_COMMAND_SIZE;
			let params = data.get(params_start..params_start + size).ok_or_else(|| {
				BoltError::insufficient_data(t, params_start + size, data.len())
			})?;
			commands.push(TimelineCommand {
				delay,
				reps,
				op: TimelineOp::decode(opcode, params)?,
			});
			cursor = params_start + size;
		}

		Ok(Self {
			header,
			commands,
		})
	}

	/// Serializes the timeline; the unknown header bytes are written as zero
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = vec![0u8; TIMELINE_HEADER_SIZE];
		out[8..10].copy_from_slice(&(self.commands.len() as u16).to_be_bytes());
		out[10..12].copy_from_slice(&self.header.frame_period.to_be_bytes());
		for command in &self.commands {
			out.extend_from_slice(&command.delay.to_be_bytes());
			out.extend_from_slice(&command.op.opcode().to_be_bytes());
			out.push(command.reps);
			command.op.write_params(&mut out);
		}
		out
	}
}
