//! BOLT-LZ decompression

use log::trace;

use crate::file::{BoltError, FileType};

use super::modes;

/// State structure for the decompressor
#[derive(Debug)]
struct DecompressorState<'a> {
	input: &'a [u8],
	output: &'a mut [u8],
	read_offset: usize,
	write_position: usize,
}

impl<'a> DecompressorState<'a> {
	fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
		Self {
			input,
			output,
			read_offset: 0,
			write_position: 0,
		}
	}

	fn read_byte(&mut self) -> Result<u8, BoltError> {
		let Some(&byte) = self.input.get(self.read_offset) else {
			return Err(BoltError::corrupt(
				FileType::Boltlib,
				format!(
					"compressed stream ended at byte {} with {} of {} bytes decoded",
					self.read_offset,
					self.write_position,
					self.output.len()
				),
			));
		};
		self.read_offset += 1;
		Ok(byte)
	}

	fn remaining(&self) -> usize {
		self.output.len() - self.write_position
	}

	/// Mode 0: literal bytes
	///
	/// `num == 31` yields a count of 0 and the control byte is wasted.
	fn copy_literals(&mut self, num: u8) -> Result<(), BoltError> {
		let count = (modes::LITERAL_BIAS - num) as usize;
		let end = self.read_offset + count;
		if end > self.input.len() {
			return Err(BoltError::corrupt(
				FileType::Boltlib,
				format!("literal run of {count} bytes overruns compressed stream"),
			));
		}

		let count = count.min(self.remaining());
		self.output[self.write_position..self.write_position + count]
			.copy_from_slice(&self.input[self.read_offset..self.read_offset + count]);
		self.read_offset = end;
		self.write_position += count;
		Ok(())
	}

	/// Modes 1 and 2: repeat previously decoded data
	///
	/// Must copy byte by byte: when `count` exceeds `offset` the copied run
	/// repeats itself.
	fn copy_back_reference(&mut self, offset: usize, count: usize) -> Result<(), BoltError> {
		if offset == 0 || offset > self.write_position {
			return Err(BoltError::corrupt(
				FileType::Boltlib,
				format!(
					"back reference to offset {offset} at output position {}",
					self.write_position
				),
			));
		}

		let count = count.min(self.remaining());
		for _ in 0..count {
			self.output[self.write_position] = self.output[self.write_position - offset];
			self.write_position += 1;
		}
		Ok(())
	}

	/// Mode 3 without flag: block filled with a constant byte
	fn fill(&mut self, num: u8) -> Result<(), BoltError> {
		let high = self.read_byte()? as usize;
		// This byte is ignored by the original decoder
		let _ = self.read_byte()?;
		let value = self.read_byte()?;

		let count = (32 - num as usize + 32 * high) * 4;
		let count = count.min(self.remaining());
		self.output[self.write_position..self.write_position + count].fill(value);
		self.write_position += count;
		Ok(())
	}

	fn run(&mut self) -> Result<(), BoltError> {
		// The format has no end marker; the output size is the only terminator.
		while self.write_position < self.output.len() {
			let control = self.read_byte()?;

			let mode = control >> 6;
			let flag = (control >> 5) & 1 != 0;
			let num = control & 0x1F;

			match (mode, flag) {
				(modes::LITERAL, _) => self.copy_literals(num)?,
				(modes::SHORT_REPEAT, _) => {
					let offset = self.read_byte()? as usize + if flag { 256 } else { 0 };
					let count = (modes::SHORT_REPEAT_BIAS - num) as usize;
					self.copy_back_reference(offset, count)?;
				}
				(modes::LONG_REPEAT, _) => {
					let offset = self.read_byte()? as usize * 2;
					let count = (32 - num as usize) * 4 + if flag { 2 } else { 0 };
					self.copy_back_reference(offset, count)?;
				}
				(modes::EXTENDED, true) => {
					// The original program checked for end of data here; the
					// output size check above covers it.
					trace!(
						"BOLT-LZ end marker 0x{control:02X} at input offset {}",
						self.read_offset - 1
					);
				}
				(modes::EXTENDED, false) => self.fill(num)?,
				_ => {
					return Err(BoltError::corrupt(
						FileType::Boltlib,
						format!("unreachable decompressor state for control byte 0x{control:02X}"),
					));
				}
			}
		}

		Ok(())
	}
}

/// Decompresses a BOLT-LZ stream into `output`.
///
/// `output` must be sized to the exact uncompressed size; decoding stops as
/// soon as it is full. Trailing input is ignored. Commands that would run
/// past the end of `output` are clamped.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<(), BoltError> {
	DecompressorState::new(input, output).run()
}

/// Decompresses a BOLT-LZ stream into a new buffer of `size` bytes
pub fn decompress_to_vec(input: &[u8], size: usize) -> Result<Vec<u8>, BoltError> {
	let mut output = vec![0u8; size];
	decompress(input, &mut output)?;
	Ok(output)
}
