use std::cell::RefCell;
use std::rc::Rc;

use bolt_types::file::{
	CelCommand, CelOp, CelSequenceBuilder, ImageEncoding, MovieBuilder, PacketType, PfBuilder, PfFile, Queue01Image,
	TimelineCommand, TimelineHeader, fourcc,
};
use bytes::Bytes;

use super::*;
use crate::graphics::Ratio;
use crate::headless::HeadlessHost;

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

fn ramp_palette() -> Vec<u8> {
	(0..128u8).flat_map(|i| [i, 0, 0]).collect()
}

fn image(queue: u16, pixel: u8) -> Vec<u8> {
	Queue01Image::build(queue, 4, 4, ImageEncoding::Clut7, &ramp_palette(), &[pixel; 16])
}

fn cel_command(cel_number: u8, op: CelOp) -> CelCommand {
	CelCommand {
		cel_number,
		op,
	}
}

fn host() -> HeadlessHost {
	HeadlessHost::new(16, 16)
}

fn back_draws(host: &HeadlessHost) -> Vec<(i32, i32)> {
	host.graphics.surface().draws().iter().filter(|d| d.plane == Plane::Back).map(|d| (d.x, d.y)).collect()
}

#[test_log::test]
fn test_start_steps_first_frame() {
	let data = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(100, &[(0, 1, TimelineOp::DrawBack), (1, 1, TimelineOp::DrawFore)]))
		.buffer(PacketType::Video, &image(1, 5))
		.buffer(PacketType::Video, &image(0, 6))
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();

	assert_eq!(movie.mode(), PlaybackMode::Playing);
	assert_eq!(movie.current_frame(), 1);
	assert_eq!(movie.frame_period(), 100);
	assert_eq!(host.next_msg, Some(BoltMsg::Drive));
	assert_eq!(host.graphics.surface().clears(Plane::Fore), 1);
	assert_eq!(host.graphics.query(Plane::Back, 0, 0), 5);
	assert_eq!(host.graphics.base_color(Plane::Back, 7), [7, 0, 0]);
	assert_eq!(host.graphics.surface().dirty_count(), 1);

	// Fore is due one frame later
	assert_eq!(host.graphics.query(Plane::Fore, 0, 0), 0);
	host.dispatch(&mut movie, BoltMsg::AddTicks(60));
	assert_eq!(movie.current_frame(), 1);
	host.dispatch(&mut movie, BoltMsg::AddTicks(40));
	assert_eq!(movie.current_frame(), 2);
	assert_eq!(host.graphics.query(Plane::Fore, 3, 3), 6);
	assert_eq!(movie.mode(), PlaybackMode::Finished);
}

#[test_log::test]
fn test_catch_up_is_bounded() {
	let data = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(100, &[(1, 255, TimelineOp::Name(fourcc("TEST")))]))
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::new(PlayerConfig {
		max_catch_up_frames: 2,
		..PlayerConfig::default()
	});
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();
	assert_eq!(movie.current_frame(), 1);

	host.dispatch(&mut movie, BoltMsg::AddTicks(1000));
	assert_eq!(movie.current_frame(), 3);

	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert_eq!(movie.current_frame(), 4);
}

#[test_log::test]
fn test_trigger_events_reach_callback() {
	let data = MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(50, &[(0, 1, TimelineOp::TriggerEvent(0x8001)), (1, 1, TimelineOp::TriggerEvent(0x8002))]),
		)
		.terminator()
		.finish();

	let events = Rc::new(RefCell::new(Vec::new()));
	let sink = events.clone();
	let mut host = host();
	let mut movie = Movie::default();
	movie.set_trigger_callback(move |opcode| sink.borrow_mut().push(opcode));

	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();
	assert_eq!(*events.borrow(), [0x8001]);

	host.dispatch(&mut movie, BoltMsg::AddTicks(50));
	assert_eq!(*events.borrow(), [0x8001, 0x8002]);
}

#[test_log::test]
fn test_color_cycles_started_and_stopped() {
	let cycle = |start, num, delay| TimelineOp::StartColorCycles {
		start,
		plane: 1,
		num,
		delay,
	};
	let data = MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(
				1000,
				&[
					(0, 1, TimelineOp::DrawBack),
					(0, 1, cycle(10, 4, -50)),
					(0, 4, cycle(100, 2, 1000)),
					(1, 1, TimelineOp::StopColorCycles),
				],
			),
		)
		.buffer(PacketType::Video, &image(1, 1))
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();

	// The fifth cycle is ignored
	assert_eq!(movie.color_cycles(), 4);
	assert_eq!(host.graphics.active_color_cycles(), 4);

	host.dispatch(&mut movie, BoltMsg::AddTicks(50));
	assert_eq!(host.graphics.base_color(Plane::Back, 10), [11, 0, 0]);
	assert_eq!(host.graphics.base_color(Plane::Back, 13), [10, 0, 0]);
	assert_eq!(host.graphics.sink().color(Plane::Back, 10), [11, 0, 0]);

	host.dispatch(&mut movie, BoltMsg::AddTicks(950));
	assert_eq!(movie.color_cycles(), 0);
	assert_eq!(host.graphics.active_color_cycles(), 0);
}

#[test_log::test]
fn test_fade_uses_smooth_animation() {
	let data = MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(
				1000,
				&[(0, 1, TimelineOp::Fade {
					duration: 100,
					direction: -1,
				})],
			),
		)
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();
	assert!(movie.is_fading());

	host.dispatch(&mut movie, BoltMsg::AddTicks(50));
	assert_eq!(host.smooth_requests, 1);
	host.dispatch(&mut movie, BoltMsg::SmoothAnimation);
	assert_eq!(host.graphics.fade(), Ratio::new(50, 100));
	assert_eq!(host.smooth_requests, 2);

	host.dispatch(&mut movie, BoltMsg::AddTicks(60));
	host.dispatch(&mut movie, BoltMsg::SmoothAnimation);
	assert_eq!(host.graphics.fade(), Ratio::ZERO);
	assert!(!movie.is_fading());
	assert_eq!(host.smooth_requests, 3);
}

#[test_log::test]
fn test_cel_scroll_and_camera_persistence() {
	let first = CelSequenceBuilder::new(8, 8)
		.frame(&[1; 10])
		.frame(&[2; 11])
		.frame(&[3; 12])
		.command(&cel_command(0, CelOp::LoadBack {
			camera_x: 0,
			camera_y: 0,
		}))
		.command(&cel_command(0, CelOp::Scroll {
			duration: 2,
			speed: 5,
			direction: 3,
		}))
		.command(&cel_command(2, CelOp::LoadForePalette {
			first: 3,
			colors: vec![9, 8, 7],
		}))
		.to_bytes();
	let second = CelSequenceBuilder::new(8, 8).frame(&[4; 13]).to_bytes();

	let data = MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(
				100,
				&[
					(0, 1, TimelineOp::StartCelSequence),
					(0, 1, TimelineOp::StepCelSequence),
					(1, 2, TimelineOp::StepCelSequence),
					(1, 1, TimelineOp::StartCelSequence),
					(0, 1, TimelineOp::StepCelSequence),
				],
			),
		)
		.buffer(PacketType::Video, &first)
		.buffer(PacketType::AuxVideo, &image(1, 0))
		.buffer(PacketType::Video, &second)
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();
	assert_eq!(movie.camera(), (0, 5));

	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert_eq!(movie.camera(), (0, 10));
	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert_eq!(movie.camera(), (0, 10));
	assert_eq!(host.graphics.base_color(Plane::Fore, 3), [9, 8, 7]);

	// A new sequence without a background keeps the camera
	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert_eq!(movie.camera(), (0, 10));

	assert_eq!(back_draws(&host), [(0, 0), (0, -5), (0, -10)]);
	let cels = host
		.graphics
		.surface()
		.draws()
		.iter()
		.filter(|d| d.plane == Plane::Fore)
		.map(|d| d.data_len)
		.collect::<Vec<_>>();
	assert_eq!(cels, [10, 11, 12, 13]);
	assert_eq!(movie.mode(), PlaybackMode::Finished);
}

#[test_log::test]
fn test_stepping_past_last_cel_repeats_it() {
	let cels = CelSequenceBuilder::new(8, 8).frame(&[1; 3]).frame(&[2; 4]).to_bytes();
	let data = MovieBuilder::new()
		.buffer(
			PacketType::Timeline,
			&timeline(100, &[(0, 1, TimelineOp::StartCelSequence), (0, 4, TimelineOp::StepCelSequence)]),
		)
		.buffer(PacketType::Video, &cels)
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();
	let sizes = host.graphics.surface().draws().iter().map(|d| d.data_len).collect::<Vec<_>>();
	assert_eq!(sizes, [3, 4, 4, 4]);
}

#[test_log::test]
fn test_audio_outlasts_timeline() {
	let samples = vec![0x80u8; 2205];
	let data = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(100, &[(0, 1, TimelineOp::Name(fourcc("TEST")))]))
		.buffer(PacketType::Audio, &samples)
		.buffer(PacketType::Audio, &samples)
		.buffer(PacketType::Audio, &samples)
		.split_buffer(PacketType::Audio, &samples, &[1000, 1205])
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();

	assert_eq!(movie.mode(), PlaybackMode::Finished);
	assert_eq!(host.mixer.queued_buffers(), 2);
	assert!(movie.is_running(&mut host));

	let mut ticks = 0;
	while movie.is_running(&mut host) && ticks < 10 {
		host.dispatch(&mut movie, BoltMsg::AddTicks(100));
		ticks += 1;
	}
	assert_eq!(ticks, 4);
	assert!(host.mixer.is_finished());
	assert_eq!(host.mixer.samples_played(), 4 * 2205);
}

#[test_log::test]
fn test_empty_timeline_still_plays_audio() {
	let samples = vec![0x80u8; 2205];
	let data = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(100, &[]))
		.buffer(PacketType::Audio, &samples)
		.buffer(PacketType::Audio, &samples)
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();

	assert_eq!(movie.mode(), PlaybackMode::Finished);
	assert!(host.mixer.is_playing());
	assert!(movie.is_running(&mut host));

	let mut ticks = 0;
	while movie.is_running(&mut host) && ticks < 10 {
		host.dispatch(&mut movie, BoltMsg::AddTicks(100));
		ticks += 1;
	}
	assert!(ticks < 10);
	assert!(host.mixer.is_finished());
	assert_eq!(host.mixer.samples_played(), 2 * 2205);
}

#[test_log::test]
fn test_stop_then_restart_is_clean() {
	let scroll_cels = CelSequenceBuilder::new(8, 8)
		.frame(&[1; 5])
		.frame(&[1; 5])
		.command(&cel_command(0, CelOp::LoadBack {
			camera_x: 3,
			camera_y: 4,
		}))
		.command(&cel_command(0, CelOp::Scroll {
			duration: 10,
			speed: 2,
			direction: 3,
		}))
		.to_bytes();
	let first = MovieBuilder::new()
		.buffer(PacketType::Video, &image(0, 9))
		.buffer(
			PacketType::Timeline,
			&timeline(
				100,
				&[
					(0, 1, TimelineOp::DrawBack),
					(0, 1, TimelineOp::StartColorCycles {
						start: 10,
						plane: 1,
						num: 4,
						delay: 50,
					}),
					(0, 1, TimelineOp::Fade {
						duration: 500,
						direction: 1,
					}),
					(0, 1, TimelineOp::StartCelSequence),
					(0, 5, TimelineOp::StepCelSequence),
				],
			),
		)
		.buffer(PacketType::Video, &image(1, 1))
		.buffer(PacketType::Video, &scroll_cels)
		.buffer(PacketType::Video, &image(1, 2))
		.split_buffer(PacketType::Audio, &[0x80; 300], &[100, 100, 100])
		.finish();

	let second = || {
		MovieBuilder::new()
			.buffer(
				PacketType::Timeline,
				&timeline(100, &[(0, 1, TimelineOp::StartCelSequence), (0, 1, TimelineOp::StepCelSequence)]),
			)
			.buffer(PacketType::Video, &CelSequenceBuilder::new(8, 8).frame(&[7; 6]).to_bytes())
			.terminator()
			.finish()
	};

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(first)).unwrap();
	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert!(movie.holds_buffers());
	assert_ne!(movie.camera(), (0, 0));
	assert!(movie.is_fading());
	assert_eq!(movie.color_cycles(), 1);

	movie.stop(&mut host);
	assert!(!movie.holds_buffers());
	assert!(!movie.is_running(&mut host));
	assert_eq!(movie.mode(), PlaybackMode::Idle);
	assert_eq!(movie.camera(), (0, 0));
	assert_eq!(movie.color_cycles(), 0);
	assert!(!movie.is_fading());
	assert_eq!(host.graphics.active_color_cycles(), 0);
	assert!(!host.mixer.is_open());

	let draws_before = host.graphics.surface().draws().len();
	movie.start(&mut host, std::io::Cursor::new(second())).unwrap();
	let restarted = host.graphics.surface().draws()[draws_before..].to_vec();

	let mut fresh_host = self::host();
	let mut fresh = Movie::default();
	fresh.start(&mut fresh_host, std::io::Cursor::new(second())).unwrap();

	assert_eq!(restarted, fresh_host.graphics.surface().draws());
	assert_eq!(movie.camera(), fresh.camera());
	assert_eq!(movie.current_frame(), fresh.current_frame());
	assert_eq!(movie.color_cycles(), fresh.color_cycles());
	assert_eq!(movie.is_fading(), fresh.is_fading());
	assert_eq!(movie.packets_read(), fresh.packets_read());
}

#[test_log::test]
fn test_movie_without_timeline_stays_idle() {
	let data = MovieBuilder::new().buffer(PacketType::Video, &image(0, 1)).terminator().finish();
	let mut host = host();
	let mut movie = Movie::default();
	let err = movie.start(&mut host, std::io::Cursor::new(data)).unwrap_err();
	assert!(err.is_corrupt_asset());
	assert_eq!(movie.mode(), PlaybackMode::Idle);
	assert!(!movie.holds_buffers());
	assert_eq!(movie.handle_msg(&mut host, BoltMsg::AddTicks(100)), BoltRsp::Pass);
}

#[test_log::test]
fn test_unknown_timeline_opcode_is_corrupt() {
	let mut bad = timeline(100, &[(0, 1, TimelineOp::DrawFore)]);
	bad[14..16].copy_from_slice(&0x0042u16.to_be_bytes());
	let data = MovieBuilder::new().buffer(PacketType::Timeline, &bad).terminator().finish();

	let mut host = host();
	let mut movie = Movie::default();
	let err = movie.start(&mut host, std::io::Cursor::new(data)).unwrap_err();
	assert!(matches!(err, PlayerError::Bolt(BoltError::CorruptAsset { .. })));
	assert_eq!(movie.mode(), PlaybackMode::Idle);
}

#[test_log::test]
fn test_corrupt_image_aborts_playback() {
	let data = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(100, &[(2, 1, TimelineOp::DrawFore)]))
		.buffer(PacketType::Video, &[0, 0, 1, 2, 3])
		.terminator()
		.finish();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();
	host.dispatch(&mut movie, BoltMsg::AddTicks(100));
	assert_eq!(movie.mode(), PlaybackMode::Idle);
	assert!(!movie.holds_buffers());
}

#[test_log::test]
fn test_start_from_pf() {
	let stream = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(100, &[(0, 1, TimelineOp::DrawFore)]))
		.buffer(PacketType::Video, &image(0, 3))
		.terminator()
		.finish();
	let mut builder = PfBuilder::new();
	builder.add_movie(fourcc("INTR"), stream);
	let pf = PfFile::from_bytes(Bytes::from(builder.to_bytes())).unwrap();

	let mut host = host();
	let mut movie = Movie::default();
	movie.start_from(&mut host, &pf, fourcc("INTR")).unwrap();
	assert_eq!(host.graphics.query(Plane::Fore, 1, 1), 3);

	let err = movie.start_from(&mut host, &pf, fourcc("NONE")).unwrap_err();
	assert!(matches!(err, PlayerError::Bolt(BoltError::MovieNotFound(_))));
	assert_eq!(movie.mode(), PlaybackMode::Idle);
}

#[test_log::test]
fn test_zero_frame_period_plays() {
	let data = MovieBuilder::new()
		.buffer(PacketType::Timeline, &timeline(0, &[(1, 3, TimelineOp::StepCelSequence)]))
		.terminator()
		.finish();
	let mut host = host();
	let mut movie = Movie::default();
	movie.start(&mut host, std::io::Cursor::new(data)).unwrap();
	assert_eq!(movie.frame_period(), 1);
	host.dispatch(&mut movie, BoltMsg::AddTicks(2));
	assert_eq!(movie.current_frame(), 3);
	assert_eq!(movie.mode(), PlaybackMode::Finished);
}
