//! PF movie file utility.
//!
//! Provides four subcommands:
//! - `list`: print the movie directory.
//! - `packets`: dump the packet headers of one movie.
//! - `audio`: export the audio track of one movie as a WAV file.
//! - `play`: run a movie on the headless host and print a JSON report.
//!
//! ```bash
//! cargo run --example pf_utils -- list MERLIN.PF
//! cargo run --example pf_utils -- audio MERLIN.PF INTR -o intr.wav
//! cargo run --example pf_utils -- play MERLIN.PF INTR --draws
//! ```

use std::{
	cell::RefCell,
	io::{self, Read},
	path::PathBuf,
	rc::Rc,
};

use anyhow::{Context, Result, bail};
use bolt_rs::bolt_player::headless::DrawCall;
use bolt_rs::bolt_types::file::sound::write_wav;
use bolt_rs::prelude::*;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::List(opts) => run_list(opts),
		Command::Packets(opts) => run_packets(opts),
		Command::Audio(opts) => run_audio(opts),
		Command::Play(opts) => run_play(opts),
	}
}

#[derive(Parser)]
#[command(name = "pf_utils")]
#[command(author = "bolt-rs project")]
#[command(version)]
#[command(about = "Inspect and play PF movie files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List the movies of a PF file
	List(FileArgs),
	/// Dump the packet headers of a movie
	Packets(MovieArgs),
	/// Export the audio track of a movie as WAV
	Audio(AudioArgs),
	/// Play a movie headless and report what it did
	Play(PlayArgs),
}

#[derive(Args)]
struct FileArgs {
	/// PF file
	#[arg(value_name = "FILE")]
	file: PathBuf,
}

#[derive(Args)]
struct MovieArgs {
	/// PF file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Four character movie name
	#[arg(value_name = "MOVIE")]
	movie: String,
}

#[derive(Args)]
struct AudioArgs {
	#[command(flatten)]
	movie: MovieArgs,

	/// Output WAV file
	#[arg(short, long, value_name = "OUTPUT")]
	output: PathBuf,
}

#[derive(Args)]
struct PlayArgs {
	#[command(flatten)]
	movie: MovieArgs,

	/// Player configuration file
	#[arg(short, long, value_name = "CONFIG", env = "BOLT_CONFIG")]
	config: Option<PathBuf>,

	/// Milliseconds per engine tick
	#[arg(long, value_name = "MS", default_value_t = 16)]
	tick: u32,

	/// Give up after this many milliseconds of movie time
	#[arg(long, value_name = "MS", default_value_t = 10 * 60 * 1000)]
	limit: u64,

	/// Include every draw call in the report
	#[arg(long, default_value_t = false)]
	draws: bool,
}

#[derive(Serialize)]
struct PlayReport {
	movie: String,
	elapsed_ms: u64,
	frames: u32,
	frame_period: u32,
	packets_read: usize,
	samples_played: usize,
	fore_clears: usize,
	back_clears: usize,
	palette_updates: usize,
	triggers: Vec<u16>,
	finished: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	draws: Option<Vec<DrawCall>>,
}

fn movie_name(name: &str) -> Result<u32> {
	if name.len() != 4 || !name.is_ascii() {
		bail!("Movie names are four ASCII characters, got {name:?}");
	}
	Ok(fourcc(name))
}

fn open_movie(args: &MovieArgs) -> Result<(PfFile<PathBuf>, u32)> {
	let pf = PfFile::open(&args.file).with_context(|| format!("Failed to open {}", args.file.display()))?;
	Ok((pf, movie_name(&args.movie)?))
}

fn run_list(args: FileArgs) -> Result<()> {
	let pf = PfFile::open(&args.file).with_context(|| format!("Failed to open {}", args.file.display()))?;
	println!("Movies: {}", pf.movies().len());
	for (idx, movie) in pf.movies().iter().enumerate() {
		println!("  [{idx:3}] {} @ 0x{:08X}", movie.name_string(), movie.offset);
	}
	Ok(())
}

fn run_packets(args: MovieArgs) -> Result<()> {
	let (pf, name) = open_movie(&args)?;
	let Some(mut reader) = pf.seek_movie(name)? else {
		bail!("Movie {} not found", args.movie);
	};

	let mut index = 0usize;
	loop {
		let header = match PacketHeader::from_reader(&mut reader) {
			Ok(header) => header,
			Err(e) => {
				warn!("Stream ended without a terminator: {e}");
				break;
			}
		};
		println!(
			"[{index:5}] {:<12} partial {:>7} total {:>7} reserved {}",
			header.packet_type.to_string(),
			header.partial_size,
			header.total_size,
			header.reserved
		);
		if header.packet_type == PacketType::Terminator {
			break;
		}
		io::copy(&mut (&mut reader).take(u64::from(header.partial_size)), &mut io::sink())?;
		index += 1;
	}
	Ok(())
}

fn run_audio(args: AudioArgs) -> Result<()> {
	let (pf, name) = open_movie(&args.movie)?;
	let Some(mut reader) = pf.seek_movie(name)? else {
		bail!("Movie {} not found", args.movie.movie);
	};

	let mut samples = Vec::new();
	loop {
		let header = match PacketHeader::from_reader(&mut reader) {
			Ok(header) => header,
			Err(e) => {
				warn!("Stream ended without a terminator: {e}");
				break;
			}
		};
		if header.packet_type == PacketType::Terminator {
			break;
		}
		let mut payload = (&mut reader).take(u64::from(header.partial_size));
		if header.packet_type == PacketType::Audio {
			payload.read_to_end(&mut samples)?;
		} else {
			io::copy(&mut payload, &mut io::sink())?;
		}
	}

	let file = std::fs::File::create(&args.output)
		.with_context(|| format!("Failed to create {}", args.output.display()))?;
	write_wav(&samples, io::BufWriter::new(file))?;
	info!(
		"Wrote {} samples ({} ms) to {}",
		samples.len(),
		BltSound::new(samples).duration_ms(),
		args.output.display()
	);
	Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
	let (pf, name) = open_movie(&args.movie)?;
	let config = PlayerConfig::load(args.config.as_deref())?;

	let triggers = Rc::new(RefCell::new(Vec::new()));
	let mut movie = Movie::new(config);
	let sink = Rc::clone(&triggers);
	movie.set_trigger_callback(move |event| sink.borrow_mut().push(event));

	let mut host = HeadlessHost::new(640, 480);
	movie.start_from(&mut host, &pf, name)?;

	let mut elapsed_ms = 0u64;
	while movie.is_running(&mut host) && elapsed_ms < args.limit {
		host.dispatch(&mut movie, BoltMsg::AddTicks(args.tick));
		while host.dispatch_pending(&mut movie) {}
		if host.smooth_requests > 0 {
			host.smooth_requests = 0;
			host.dispatch(&mut movie, BoltMsg::SmoothAnimation);
		}
		elapsed_ms += u64::from(args.tick);
	}

	let finished = !movie.is_running(&mut host);
	if !finished {
		warn!("Movie still running after {} ms", args.limit);
	}

	let surface = host.graphics.surface();
	let report = PlayReport {
		movie: args.movie.movie.clone(),
		elapsed_ms,
		frames: movie.current_frame(),
		frame_period: movie.frame_period(),
		packets_read: movie.packets_read(),
		samples_played: host.mixer.samples_played(),
		fore_clears: surface.clears(Plane::Fore),
		back_clears: surface.clears(Plane::Back),
		palette_updates: host.graphics.sink().updates(),
		triggers: triggers.borrow().clone(),
		finished,
		draws: args.draws.then(|| surface.draws().to_vec()),
	};
	println!("{}", serde_json::to_string_pretty(&report)?);

	movie.stop(&mut host);
	Ok(())
}
