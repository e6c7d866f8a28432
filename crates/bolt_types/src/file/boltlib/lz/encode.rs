//! BOLT-LZ Compression
//!
//! ## Overview
//!
//! A greedy reference encoder producing streams the decoder in `decode.rs`
//! accepts. The original games only ever shipped decoders, so this exists
//! for tooling and tests.
//!
//! ## Algorithm
//!
//! For each input position:
//! 1. A run of at least 8 identical bytes becomes a fill command covering
//!    the largest multiple of 4 of the run.
//! 2. Otherwise the longest back reference within 511 bytes is searched.
//!    Short repeats cover 4..=35 bytes at any offset, long repeats cover
//!    lengths `4k` or `4k + 2` up to 130 bytes at even offsets.
//! 3. Otherwise the byte is queued as a literal. Literals are flushed in
//!    chunks of at most 31 bytes.

use super::modes;

/// Longest back reference distance for short repeats
const MAX_SHORT_OFFSET: usize = 511;

/// Longest back reference distance for long repeats
const MAX_LONG_OFFSET: usize = 510;

/// Longest run covered by one short repeat
const MAX_SHORT_LEN: usize = modes::SHORT_REPEAT_BIAS as usize;

/// Longest run covered by one long repeat
const MAX_LONG_LEN: usize = 130;

/// Longest fill in 4-byte units (`32 - 0 + 32 * 255`)
const MAX_FILL_UNITS: usize = 32 + 32 * 255;

/// Shortest run worth encoding as a fill
const MIN_FILL_RUN: usize = 8;

/// Shortest back reference worth encoding
const MIN_MATCH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
	Short {
		offset: usize,
		len: usize,
	},
	Long {
		offset: usize,
		len: usize,
	},
}

impl Command {
	fn len(self) -> usize {
		match self {
			Command::Short {
				len,
				..
			}
			| Command::Long {
				len,
				..
			} => len,
		}
	}
}

#[derive(Debug)]
struct CompressorState<'a> {
	input: &'a [u8],
	position: usize,
	literals: Vec<u8>,
	output: Vec<u8>,
}

impl<'a> CompressorState<'a> {
	fn new(input: &'a [u8]) -> Self {
		Self {
			input,
			position: 0,
			literals: Vec::with_capacity(31),
			output: Vec::with_capacity(input.len() / 2 + 16),
		}
	}

	fn flush_literals(&mut self) {
		for chunk in self.literals.chunks(modes::LITERAL_BIAS as usize) {
			self.output.push(modes::LITERAL_BIAS - chunk.len() as u8);
			self.output.extend_from_slice(chunk);
		}
		self.literals.clear();
	}

	fn run_length(&self) -> usize {
		let first = self.input[self.position];
		self.input[self.position..]
			.iter()
			.take(MAX_FILL_UNITS * 4)
			.take_while(|&&b| b == first)
			.count()
	}

	fn match_length(&self, offset: usize, limit: usize) -> usize {
		let mut len = 0;
		while len < limit
			&& self.position + len < self.input.len()
			&& self.input[self.position + len] == self.input[self.position + len - offset]
		{
			len += 1;
		}
		len
	}

	fn find_best_match(&self) -> Option<Command> {
		let mut best: Option<Command> = None;
		let max_offset = self.position.min(MAX_SHORT_OFFSET);

		for offset in 1..=max_offset {
			let len = self.match_length(offset, MAX_LONG_LEN);
			if len < MIN_MATCH {
				continue;
			}

			let mut candidate = Command::Short {
				offset,
				len: len.min(MAX_SHORT_LEN),
			};

			if offset % 2 == 0 && offset <= MAX_LONG_OFFSET {
				// Long repeats encode lengths 4k or 4k + 2 only
				let long_len = if len % 2 == 1 {
					len - 1
				} else {
					len
				};
				if long_len > candidate.len() {
					candidate = Command::Long {
						offset,
						len: long_len,
					};
				}
			}

			if best.is_none_or(|b| candidate.len() > b.len()) {
				best = Some(candidate);
			}
		}

		best
	}

	fn emit_fill(&mut self, units: usize) {
		let high = (units - 1) / 32;
		let num = 32 - (units - 32 * high);
		self.output.push((modes::EXTENDED << 6) | num as u8);
		self.output.push(high as u8);
		self.output.push(0);
		self.output.push(self.input[self.position]);
		self.position += units * 4;
	}

	fn emit_command(&mut self, command: Command) {
		match command {
			Command::Short {
				offset,
				len,
			} => {
				let flag = if offset >= 256 {
					0x20
				} else {
					0
				};
				let num = modes::SHORT_REPEAT_BIAS as usize - len;
				self.output.push((modes::SHORT_REPEAT << 6) | flag | num as u8);
				self.output.push((offset & 0xFF) as u8);
			}
			Command::Long {
				offset,
				len,
			} => {
				let flag = if len % 4 == 2 {
					0x20
				} else {
					0
				};
				let num = 32 - (len & !3) / 4;
				self.output.push((modes::LONG_REPEAT << 6) | flag | num as u8);
				self.output.push((offset / 2) as u8);
			}
		}
		self.position += command.len();
	}

	fn compress(mut self) -> Vec<u8> {
		while self.position < self.input.len() {
			let run = self.run_length();
			if run >= MIN_FILL_RUN {
				self.flush_literals();
				self.emit_fill(run / 4);
				continue;
			}

			if let Some(command) = self.find_best_match() {
				self.flush_literals();
				self.emit_command(command);
				continue;
			}

			self.literals.push(self.input[self.position]);
			self.position += 1;
		}

		self.flush_literals();
		self.output
	}
}

/// Compresses `data` into a BOLT-LZ stream.
///
/// The stream does not record its decompressed size; callers must store
/// `data.len()` alongside it.
pub fn compress(data: &[u8]) -> Vec<u8> {
	CompressorState::new(data).compress()
}
