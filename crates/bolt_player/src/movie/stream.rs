//! Demultiplexing of PF packet streams.

use std::collections::VecDeque;
use std::io::{self, Read};

use bolt_types::file::{PACKET_HEADER_SIZE, PacketHeader, PacketType};
use bytes::Bytes;
use log::{error, trace, warn};

use crate::audio::AudioSink;

/// Number of video queues
pub const NUM_VIDEO_QUEUES: usize = 5;

/// Queue a buffer can be fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Queue {
	Timeline,
	Video(usize),
}

/// Reassembles one logical buffer from partial packets
#[derive(Debug, Default)]
pub(crate) struct BufferAssembler {
	buf: Option<Vec<u8>>,
	total_size: usize,
	cursor: usize,
}

impl BufferAssembler {
	/// Reads the payload of one packet; returns the buffer once complete
	///
	/// Payload bytes beyond the buffer end are skipped with a warning.
	pub fn read_packet<R: Read + ?Sized>(
		&mut self,
		header: &PacketHeader,
		reader: &mut R,
	) -> io::Result<Option<Bytes>> {
		if self.buf.is_some() {
			if header.total_size as usize != self.total_size {
				warn!("Bad PF packet: total size field mismatch");
			}
		} else {
			self.total_size = header.total_size as usize;
			self.cursor = 0;
		}
		let total_size = self.total_size;
		let buf = self.buf.get_or_insert_with(|| vec![0; total_size]);

		let mut partial = header.partial_size as usize;
		let mut excess = 0;
		if self.cursor + partial > self.total_size {
			warn!("Bad PF packet: buffer overflow");
			excess = self.cursor + partial - self.total_size;
			partial = self.total_size - self.cursor;
		}

		reader.read_exact(&mut buf[self.cursor..self.cursor + partial])?;
		self.cursor += partial;
		if excess > 0 {
			skip(reader, excess)?;
		}

		if self.cursor >= self.total_size {
			Ok(self.buf.take().map(Bytes::from))
		} else {
			Ok(None)
		}
	}

	/// Returns true while a buffer is partially assembled
	pub fn in_progress(&self) -> bool {
		self.buf.is_some()
	}

	/// Drops any partial buffer
	pub fn reset(&mut self) {
		self.buf = None;
		self.total_size = 0;
		self.cursor = 0;
	}
}

fn skip<R: Read + ?Sized>(reader: &mut R, count: usize) -> io::Result<()> {
	let skipped = io::copy(&mut reader.take(count as u64), &mut io::sink())?;
	if skipped < count as u64 {
		return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "packet payload truncated"));
	}
	Ok(())
}

/// Packet reader feeding the timeline queue, the video queues and the
/// audio stream
#[derive(Default)]
pub(crate) struct PacketStream {
	reader: Option<Box<dyn Read>>,
	active: bool,
	audio_open: bool,
	timeline: BufferAssembler,
	audio: BufferAssembler,
	video: BufferAssembler,
	aux_video: BufferAssembler,
	timeline_queue: VecDeque<Bytes>,
	video_queues: [VecDeque<Bytes>; NUM_VIDEO_QUEUES],
	packets_read: usize,
}

impl PacketStream {
	/// Starts parsing a new movie
	pub fn open(&mut self, reader: Box<dyn Read>) {
		self.reset();
		self.reader = Some(reader);
		self.active = true;
	}

	/// Marks the audio stream as open so audio buffers are delivered
	pub fn open_audio(&mut self) {
		self.audio_open = true;
	}

	/// Drops the reader, every queue and every partial buffer
	pub fn reset(&mut self) {
		self.reader = None;
		self.active = false;
		self.audio_open = false;
		self.timeline.reset();
		self.audio.reset();
		self.video.reset();
		self.aux_video.reset();
		self.timeline_queue.clear();
		for queue in &mut self.video_queues {
			queue.clear();
		}
		self.packets_read = 0;
	}

	/// Returns true until the terminator packet or a read failure
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Returns true while audio buffers are delivered to the sink
	pub fn is_audio_open(&self) -> bool {
		self.audio_open
	}

	/// Packets read since the movie started
	pub fn packets_read(&self) -> usize {
		self.packets_read
	}

	/// Bytes held in queues and partial buffers
	pub fn buffered_bytes(&self) -> usize {
		let queued = self.timeline_queue.iter().chain(self.video_queues.iter().flatten()).map(Bytes::len).sum::<usize>();
		let partial = [&self.timeline, &self.audio, &self.video, &self.aux_video]
			.iter()
			.filter_map(|a| a.buf.as_ref().map(Vec::len))
			.sum::<usize>();
		queued + partial
	}

	/// Number of buffers waiting in a queue
	pub fn queue_len(&self, queue: Queue) -> usize {
		match queue {
			Queue::Timeline => self.timeline_queue.len(),
			Queue::Video(n) => self.video_queues.get(n).map_or(0, VecDeque::len),
		}
	}

	fn queue_mut(&mut self, queue: Queue) -> Option<&mut VecDeque<Bytes>> {
		match queue {
			Queue::Timeline => Some(&mut self.timeline_queue),
			Queue::Video(n) => self.video_queues.get_mut(n),
		}
	}

	/// Reads packets until `queue` holds a buffer or the stream ends
	///
	/// Returns `None` with a warning when the stream ends first.
	pub fn fetch_buffer<A: AudioSink + ?Sized>(&mut self, queue: Queue, audio: &mut A) -> Option<Bytes> {
		while self.active && self.queue_len(queue) == 0 {
			self.read_next_packet(audio);
		}

		let buf = self.queue_mut(queue).and_then(VecDeque::pop_front);
		if buf.is_none() {
			warn!("Failed to fetch movie data buffer");
		}
		buf
	}

	/// Reads packets until `watermark` audio buffers are queued in the sink
	pub fn fill_audio_queue<A: AudioSink + ?Sized>(&mut self, audio: &mut A, watermark: usize) {
		while self.active && self.audio_open && audio.queued_buffers() < watermark {
			self.read_next_packet(audio);
		}
	}

	/// Reads and routes one packet
	///
	/// A read failure ends the stream as if a terminator was found.
	pub fn read_next_packet<A: AudioSink + ?Sized>(&mut self, audio: &mut A) {
		debug_assert!(self.active);
		if let Err(e) = self.route_next_packet(audio) {
			error!("Movie stream ended unexpectedly: {e}");
			self.end_stream(audio);
		}
	}

	fn route_next_packet<A: AudioSink + ?Sized>(&mut self, audio: &mut A) -> io::Result<()> {
		let Some(reader) = self.reader.as_mut() else {
			return Err(io::Error::new(io::ErrorKind::NotConnected, "no movie stream"));
		};

		let mut header = [0u8; PACKET_HEADER_SIZE];
		reader.read_exact(&mut header)?;
		let header = PacketHeader::from_bytes(&header);
		self.packets_read += 1;
		if header.reserved != 0 {
			warn!("Unknown pf packet header unk {}", header.reserved);
		}
		trace!(
			"packet {}: {} {}/{} bytes",
			self.packets_read, header.packet_type, header.partial_size, header.total_size
		);

		match header.packet_type {
			PacketType::Timeline => {
				if let Some(buf) = self.timeline.read_packet(&header, reader)? {
					self.timeline_queue.push_back(buf);
				}
			}
			PacketType::Audio => {
				if let Some(buf) = self.audio.read_packet(&header, reader)?
					&& self.audio_open
				{
					audio.queue_buffer(buf);
				}
			}
			PacketType::Video => {
				if let Some(buf) = self.video.read_packet(&header, reader)? {
					self.enqueue_video_buffer(buf);
				}
			}
			PacketType::AuxVideo => {
				if let Some(buf) = self.aux_video.read_packet(&header, reader)? {
					self.enqueue_video_buffer(buf);
				}
			}
			PacketType::Terminator => {
				self.end_stream(audio);
			}
			PacketType::Unknown(t) => {
				warn!("Unknown PF packet type {t} skipped");
				skip(reader, header.partial_size as usize)?;
			}
		}
		Ok(())
	}

	fn enqueue_video_buffer(&mut self, buf: Bytes) {
		if buf.len() < 2 {
			warn!("Video buffer of {} bytes has no queue number", buf.len());
			return;
		}
		let queue_num = usize::from(u16::from_be_bytes([buf[0], buf[1]]));
		match self.video_queues.get_mut(queue_num) {
			Some(queue) => queue.push_back(buf),
			None => warn!("Invalid video queue number {queue_num}"),
		}
	}

	fn end_stream<A: AudioSink + ?Sized>(&mut self, audio: &mut A) {
		if self.audio_open {
			audio.finish_stream();
			self.audio_open = false;
		}
		self.active = false;
	}
}
