//! Sound resources (type 7)
//!
//! A sound resource is headerless unsigned 8-bit mono PCM at 22050 Hz.
//! Movie audio packets use the same sample format.

use std::io::{Read, Seek, Write};

use serde::Serialize;

use crate::file::boltlib::{self, BltId, BltType};
use crate::file::record::ResourceRef;
use crate::file::BoltError;

/// Sample rate of sound resources and movie audio
pub const SAMPLE_RATE: u32 = 22050;

/// Raw sound resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BltSound {
	/// Unsigned 8-bit samples
	#[serde(skip)]
	pub samples: Vec<u8>,
}

impl BltSound {
	/// Wraps raw unsigned 8-bit samples
	pub fn new(samples: Vec<u8>) -> Self {
		Self {
			samples,
		}
	}

	/// Duration in milliseconds
	pub fn duration_ms(&self) -> u64 {
		self.samples.len() as u64 * 1000 / u64::from(SAMPLE_RATE)
	}

	/// Writes the samples as an 8-bit mono WAV file
	pub fn write_wav<W: Write + Seek>(&self, writer: W) -> Result<(), BoltError> {
		write_wav(&self.samples, writer)
	}
}

/// Writes unsigned 8-bit mono samples at 22050 Hz as a WAV file
pub fn write_wav<W: Write + Seek>(samples: &[u8], writer: W) -> Result<(), BoltError> {
	let spec = hound::WavSpec {
		channels: 1,
		sample_rate: SAMPLE_RATE,
		bits_per_sample: 8,
		sample_format: hound::SampleFormat::Int,
	};
	let mut wav = hound::WavWriter::new(writer, spec)?;
	for &sample in samples {
		// hound takes signed 8-bit samples and stores them unsigned
		wav.write_sample((i16::from(sample) - 128) as i8)?;
	}
	wav.finalize()?;
	Ok(())
}

impl<R: Read + Seek> boltlib::File<R> {
	/// Loads a sound resource
	pub fn load_sound(&mut self, id: BltId) -> Result<BltSound, BoltError> {
		Ok(BltSound::new(self.load_resource(id, BltType::Sound)?))
	}

	/// Loads every sound referenced by a resource list
	pub fn load_sound_list(&mut self, id: BltId) -> Result<Vec<BltSound>, BoltError> {
		let refs: Vec<ResourceRef> = self.load_record_array(id)?;
		refs.into_iter().map(|r| self.load_sound(r.0)).collect()
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;
	use crate::file::boltlib::{Builder, Compression};

	#[test]
	fn test_wav_export() {
		let sound = BltSound::new(vec![0, 128, 255, 128]);
		let mut cursor = Cursor::new(Vec::new());
		sound.write_wav(&mut cursor).unwrap();

		cursor.set_position(0);
		let mut reader = hound::WavReader::new(cursor).unwrap();
		assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
		assert_eq!(reader.spec().bits_per_sample, 8);
		let samples: Vec<i8> = reader.samples::<i8>().map(Result::unwrap).collect();
		assert_eq!(samples, [-128, 0, 127, 0]);
	}

	#[test]
	fn test_sound_list() {
		let mut builder = Builder::new();
		let dir = builder.add_directory();
		let a = builder.add_resource(dir, BltType::Sound, Compression::Lz, &[128; 2205]).unwrap();
		let b = builder.add_resource(dir, BltType::Sound, Compression::Raw, &[1, 2, 3]).unwrap();

		let mut list = Vec::new();
		list.extend_from_slice(&BltId::from(a).0.to_be_bytes());
		list.extend_from_slice(&BltId::from(b).0.to_be_bytes());
		let list_id = builder.add_resource(dir, BltType::ResourceList, Compression::Raw, &list).unwrap();

		let mut file = builder.build_file().unwrap();
		let sounds = file.load_sound_list(list_id.into()).unwrap();
		assert_eq!(sounds.len(), 2);
		assert_eq!(sounds[0].duration_ms(), 100);
		assert_eq!(sounds[1].samples, [1, 2, 3]);
	}
}
