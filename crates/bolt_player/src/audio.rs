//! Audio output collaborator.

use bytes::Bytes;

/// Queuing PCM stream of the mixer
///
/// Movie audio is raw unsigned 8-bit mono PCM. A movie opens one stream,
/// queues buffers as they are demultiplexed and finishes the stream once
/// the packet stream ends; the mixer keeps playing until the queue drains.
pub trait AudioSink {
	/// Opens a new queuing stream, discarding any previous one
	fn open_stream(&mut self, sample_rate: u32);

	/// Appends a buffer of unsigned 8-bit samples
	fn queue_buffer(&mut self, samples: Bytes);

	/// Buffers queued and not yet fully played
	fn queued_buffers(&self) -> usize;

	/// Marks the end of the stream
	fn finish_stream(&mut self);

	/// Starts playing the stream
	fn play(&mut self);

	/// Stops playback and drops the stream
	fn stop(&mut self);

	/// Returns true while the stream is playing and has data left
	fn is_playing(&self) -> bool;
}
