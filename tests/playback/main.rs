//! End-to-end playback through the public `bolt-rs` surface.

use std::cell::RefCell;
use std::rc::Rc;

use bolt_rs::bolt_types::file::{TimelineCommand, TimelineHeader};
use bolt_rs::prelude::*;

const FORE_PIXEL: u8 = 6;
const BACK_PIXEL: u8 = 5;
const AUDIO_BUFFER: usize = 2205;

fn timeline(frame_period: u16, commands: &[(u16, u8, TimelineOp)]) -> Vec<u8> {
	Timeline {
		header: TimelineHeader {
			num_commands: commands.len() as u16,
			frame_period,
		},
		commands: commands
			.iter()
			.map(|&(delay, reps, op)| TimelineCommand {
				delay,
				reps,
				op,
			})
			.collect(),
	}
	.to_bytes()
}

/// Palette resource covering a whole plane: `[i * 2, 100, 50]`
fn palette_resource() -> Vec<u8> {
	let mut data = vec![0, 0, 0, 0, 0, 127];
	data.extend((0..128u8).flat_map(|i| [i * 2, 100, 50]));
	data
}

/// Container holding the movie palette and the background pixels
fn boltlib() -> BoltlibFile<std::io::Cursor<Vec<u8>>> {
	let mut builder = BoltlibBuilder::new();
	let dir = builder.add_directory();
	builder.add_resource(dir, BltType::Palette, Compression::Lz, &palette_resource()).unwrap();
	builder.add_resource(dir, BltType::U8Values, Compression::Lz, &[BACK_PIXEL; 64]).unwrap();
	builder.build_file().unwrap()
}

fn intro_stream(boltlib: &mut BoltlibFile<std::io::Cursor<Vec<u8>>>) -> Vec<u8> {
	let palette = boltlib.load_palette(BltShortId::new(0, 0).into()).unwrap();
	let pixels = boltlib.load_resource(BltShortId::new(0, 1).into(), BltType::U8Values).unwrap();
	assert_eq!(pixels, [BACK_PIXEL; 64]);

	let back = Queue01Image::build(1, 8, 8, ImageEncoding::Clut7, palette.colors(), &pixels);
	let fore = Queue01Image::build(0, 2, 2, ImageEncoding::Clut7, palette.colors(), &[FORE_PIXEL; 4]);
	let samples = vec![0x80u8; AUDIO_BUFFER];

	MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(
				100,
				&[
					(0, 1, TimelineOp::DrawBack),
					(
						0,
						1,
						TimelineOp::Fade {
							duration: 200,
							direction: 1,
						},
					),
					(0, 1, TimelineOp::TriggerEvent(0x8001)),
					(1, 1, TimelineOp::DrawFore),
					(2, 1, TimelineOp::TriggerEvent(0x8002)),
				],
			),
		)
		.buffer(PacketType::Audio, &samples)
		.buffer(PacketType::Audio, &samples)
		.buffer(PacketType::Video, &back)
		.buffer(PacketType::Video, &fore)
		.split_buffer(PacketType::Audio, &samples, &[1000, 1205])
		.terminator()
		.finish()
}

fn tour_stream() -> Vec<u8> {
	MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(50, &[(0, 1, TimelineOp::Name(fourcc("TOUR"))), (3, 1, TimelineOp::DrawFore)]),
		)
		.buffer(PacketType::Video, &Queue01Image::build(0, 2, 2, ImageEncoding::Clut7, &[], &[9; 4]))
		.terminator()
		.finish()
}

fn pf_file() -> PfFile<bytes::Bytes> {
	let mut boltlib = boltlib();
	let mut builder = PfBuilder::new();
	builder.add_movie(fourcc("INTR"), intro_stream(&mut boltlib));
	builder.add_movie(fourcc("TOUR"), tour_stream());
	PfFile::from_bytes(builder.to_bytes()).unwrap()
}

/// Ticks the movie until it stops, returning the number of ticks
fn run_to_end(host: &mut HeadlessHost, movie: &mut Movie, tick: u32, limit: usize) -> usize {
	let mut ticks = 0;
	while movie.is_running(host) && ticks < limit {
		host.dispatch(movie, BoltMsg::AddTicks(tick));
		while host.dispatch_pending(movie) {}
		ticks += 1;
	}
	ticks
}

#[test_log::test]
fn test_intro_plays_to_completion() {
	let pf = pf_file();
	let events = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&events);

	let mut host = HeadlessHost::new(640, 480);
	let mut movie = Movie::new(PlayerConfig::default());
	movie.set_trigger_callback(move |event| sink.borrow_mut().push(event));
	movie.start_from(&mut host, &pf, fourcc("INTR")).unwrap();

	assert_eq!(movie.mode(), PlaybackMode::Playing);
	assert_eq!(*events.borrow(), [0x8001]);
	assert_eq!(host.graphics.query(Plane::Back, 7, 7), BACK_PIXEL);
	assert_eq!(host.graphics.base_color(Plane::Back, 10), [20, 100, 50]);
	assert!(movie.is_fading());

	// Fading in halfway, foreground drawn
	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert_eq!(movie.current_frame(), 2);
	assert_eq!(host.graphics.fade(), Ratio::new(100, 200));
	assert_eq!(host.graphics.sink().color(Plane::Back, 10), [10, 50, 25]);
	assert_eq!(host.graphics.query(Plane::Fore, 1, 1), FORE_PIXEL);

	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert!(!movie.is_fading());
	assert_eq!(host.graphics.fade(), Ratio::ONE);
	assert_eq!(host.graphics.sink().color(Plane::Back, 10), [20, 100, 50]);

	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert_eq!(movie.mode(), PlaybackMode::Finished);
	assert_eq!(*events.borrow(), [0x8001, 0x8002]);

	run_to_end(&mut host, &mut movie, 100, 50);
	assert!(!movie.is_running(&mut host));
	assert!(host.mixer.is_finished());
	assert_eq!(host.mixer.samples_played(), 3 * AUDIO_BUFFER);

	movie.stop(&mut host);
	assert_eq!(movie.mode(), PlaybackMode::Idle);
	assert!(!movie.holds_buffers());
}

#[test_log::test]
fn test_movies_play_back_to_back() {
	let pf = pf_file();
	let mut host = HeadlessHost::new(64, 64);
	let mut movie = Movie::default();

	movie.start_from(&mut host, &pf, fourcc("INTR")).unwrap();
	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert!(host.mixer.is_open());

	// Starting the next movie stops the first one and its audio
	movie.start_from(&mut host, &pf, fourcc("TOUR")).unwrap();
	assert_eq!(movie.current_frame(), 1);
	assert_eq!(movie.frame_period(), 50);
	assert_eq!(host.mixer.samples_played(), 0);

	let ticks = run_to_end(&mut host, &mut movie, 50, 20);
	assert_eq!(ticks, 3);
	assert_eq!(movie.mode(), PlaybackMode::Finished);
	assert_eq!(host.graphics.query(Plane::Fore, 0, 0), 9);

	let err = movie.start_from(&mut host, &pf, fourcc("GONE")).unwrap_err();
	assert!(matches!(err, PlayerError::Bolt(BoltError::MovieNotFound(_))));
	assert_eq!(movie.mode(), PlaybackMode::Idle);
}

#[test_log::test]
fn test_config_file_limits_catch_up() {
	let path = std::env::temp_dir().join(format!("bolt-playback-{}.toml", std::process::id()));
	std::fs::write(&path, "max_catch_up_frames = 1\nsmooth_fades = false\n").unwrap();
	let config = PlayerConfig::load(Some(path.as_path())).unwrap();
	std::fs::remove_file(&path).unwrap();
	assert_eq!(config.max_catch_up_frames, 1);

	let stream = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(10, &[(1, 100, TimelineOp::Name(fourcc("SLOW")))]))
		.terminator()
		.finish();

	let mut host = HeadlessHost::new(8, 8);
	let mut movie = Movie::new(config);
	movie.start(&mut host, std::io::Cursor::new(stream)).unwrap();
	assert_eq!(movie.current_frame(), 1);

	host.dispatch(&mut movie, BoltMsg::AddTicks(500));
	assert_eq!(movie.current_frame(), 2);
	assert_eq!(host.smooth_requests, 0);
}

#[test_log::test]
fn test_truncated_stream_ends_gracefully() {
	let mut stream = MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(100, &[(0, 1, TimelineOp::Name(fourcc("CUT "))), (2, 1, TimelineOp::DrawFore)]),
		)
		.finish();
	// An audio packet announcing more payload than the file holds
	stream.extend_from_slice(
		&PacketHeader {
			total_size: 1000,
			partial_size: 1000,
			packet_type: PacketType::Audio,
			reserved: 0,
		}
		.to_bytes(),
	);
	stream.extend_from_slice(&[0x80; 10]);

	let mut host = HeadlessHost::new(8, 8);
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(stream)).unwrap();

	let ticks = run_to_end(&mut host, &mut movie, 100, 20);
	assert!(ticks < 20);
	assert_eq!(movie.mode(), PlaybackMode::Finished);
	assert!(host.graphics.surface().draws().is_empty());
}
