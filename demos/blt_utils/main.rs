//! BOLTLIB container utility.
//!
//! Provides four subcommands:
//! - `list`: print the directories and resource entries of a container.
//! - `extract`: decompress resources into `DDRR_TYPE.bin` files.
//! - `hash`: print the MD5 digest of every decompressed resource.
//! - `pack`: build a container from files named the way `extract` names them.
//!
//! ```bash
//! cargo run --example blt_utils -- list MERLIN.BLT --dir 0x9D
//! cargo run --example blt_utils -- extract MERLIN.BLT 0x9D01 -o out/
//! cargo run --example blt_utils -- pack out/ -o REPACKED.BLT
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use bolt_rs::prelude::*;
use bolt_rs::bolt_types::file::boltlib::ResourceEntry;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use md5::{Digest, Md5};
use serde::Serialize;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::List(opts) => run_list(opts),
		Command::Extract(opts) => run_extract(opts),
		Command::Hash(opts) => run_hash(opts),
		Command::Pack(opts) => run_pack(opts),
	}
}

#[derive(Parser)]
#[command(name = "blt_utils")]
#[command(author = "bolt-rs project")]
#[command(version)]
#[command(about = "Inspect, extract and pack BOLTLIB containers", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List directories and resources
	List(ListArgs),
	/// Decompress resources to files
	Extract(ExtractArgs),
	/// Print the MD5 digest of every resource
	Hash(HashArgs),
	/// Build a container from extracted files
	Pack(PackArgs),
}

#[derive(Args)]
struct ListArgs {
	/// Container file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Only list this directory (decimal or 0x-prefixed hex)
	#[arg(short, long, value_name = "DIR", value_parser = parse_number)]
	dir: Option<u32>,

	/// Output format
	#[arg(short, long, value_enum, default_value = "table")]
	format: OutputFormat,
}

#[derive(Args)]
struct ExtractArgs {
	/// Container file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Short ids of the resources to extract
	#[arg(value_name = "IDS", value_parser = parse_number)]
	ids: Vec<u32>,

	/// Extract every resource
	#[arg(short, long, default_value_t = false)]
	all: bool,

	/// Output directory
	#[arg(short, long, value_name = "OUTPUT_DIR", default_value = "extracted")]
	output: PathBuf,
}

#[derive(Args)]
struct HashArgs {
	/// Container file
	#[arg(value_name = "FILE")]
	file: PathBuf,
}

#[derive(Args)]
struct PackArgs {
	/// Directory of `DDRR_TYPE.bin` files
	#[arg(value_name = "INPUT_DIR")]
	input: PathBuf,

	/// Output container file
	#[arg(short, long, value_name = "OUTPUT")]
	output: PathBuf,

	/// Store resources without compression
	#[arg(long, default_value_t = false)]
	raw: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
	/// Table format
	Table,
	/// JSON format
	Json,
}

#[derive(Serialize)]
struct ListedResource {
	id: String,
	type_name: String,
	entry: ResourceEntry,
}

fn parse_number(s: &str) -> Result<u32, String> {
	let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		Some(hex) => u32::from_str_radix(hex, 16),
		None => s.parse(),
	};
	parsed.map_err(|e| format!("invalid number {s:?}: {e}"))
}

fn type_name(code: u32) -> String {
	BltType::from_code(code).map_or_else(|| format!("Unknown ({code})"), |t| t.to_string())
}

/// Every resource id in directory order
fn all_ids<R: std::io::Read + std::io::Seek>(file: &mut BoltlibFile<R>) -> Result<Vec<BltShortId>> {
	let mut ids = Vec::new();
	for dir in 0..file.directories().len() {
		let dir = dir as u8;
		let count = file.resource_table(dir)?.len();
		ids.extend((0..count).map(|res| BltShortId::new(dir, res as u8)));
	}
	Ok(ids)
}

fn run_list(args: ListArgs) -> Result<()> {
	let mut file = BoltlibFile::open(&args.file)
		.with_context(|| format!("Failed to open {}", args.file.display()))?;

	let dirs: Vec<u8> = match args.dir {
		Some(dir) if dir as usize >= file.directories().len() => {
			bail!("Directory {dir} out of range ({} directories)", file.directories().len())
		}
		Some(dir) => vec![dir as u8],
		None => (0..file.directories().len()).map(|d| d as u8).collect(),
	};

	let mut listed = Vec::new();
	for dir in dirs {
		for (res, entry) in file.resource_table(dir)?.iter().enumerate() {
			listed.push(ListedResource {
				id: BltShortId::new(dir, res as u8).to_string(),
				type_name: type_name(entry.resource_type),
				entry: *entry,
			});
		}
	}

	match args.format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listed)?),
		OutputFormat::Table => {
			println!("Directories: {}", file.directories().len());
			println!("File size: {} bytes", file.header().file_size);
			println!("\n{:<8} {:<32} {:<5} {:>10} {:>10}", "ID", "TYPE", "COMP", "SIZE", "OFFSET");
			for item in &listed {
				let compression = match item.entry.compression() {
					Ok(Compression::Lz) => "LZ",
					Ok(Compression::Raw) => "RAW",
					Err(_) => "???",
				};
				println!(
					"{:<8} {:<32} {:<5} {:>10} 0x{:08X}",
					item.id, item.type_name, compression, item.entry.size, item.entry.offset
				);
			}
		}
	}
	Ok(())
}

fn run_extract(args: ExtractArgs) -> Result<()> {
	let mut file = BoltlibFile::open(&args.file)
		.with_context(|| format!("Failed to open {}", args.file.display()))?;

	let ids = if args.all {
		all_ids(&mut file)?
	} else if args.ids.is_empty() {
		bail!("No resources given; pass ids or --all");
	} else {
		args.ids.iter().map(|&id| BltShortId(id as u16)).collect()
	};

	fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create {}", args.output.display()))?;

	let mut failed = 0;
	for id in ids {
		let entry = file.resource_entry(id.into())?;
		match file.load_resource(id.into(), entry.resource_type) {
			Ok(data) => {
				let path = args.output.join(format!("{:04X}_{}.bin", id.0, entry.resource_type));
				fs::write(&path, &data).with_context(|| format!("Failed to write {}", path.display()))?;
				info!("{id}: {} bytes -> {}", data.len(), path.display());
			}
			Err(e) => {
				warn!("{id}: {e}");
				failed += 1;
			}
		}
	}

	if failed > 0 {
		bail!("{failed} resources failed to extract");
	}
	Ok(())
}

fn run_hash(args: HashArgs) -> Result<()> {
	let mut file = BoltlibFile::open(&args.file)
		.with_context(|| format!("Failed to open {}", args.file.display()))?;

	for id in all_ids(&mut file)? {
		let entry = file.resource_entry(id.into())?;
		match file.load_resource(id.into(), entry.resource_type) {
			Ok(data) => println!("{id}  {}  {}", hex::encode(Md5::digest(&data)), type_name(entry.resource_type)),
			Err(e) => println!("{id}  <{e}>"),
		}
	}
	Ok(())
}

/// Parses `DDRR_TYPE.bin` into (dir, res, type)
fn parse_resource_name(path: &Path) -> Option<(u8, u8, u32)> {
	let stem = path.file_stem()?.to_str()?;
	let (id, code) = stem.split_once('_')?;
	let id = u16::from_str_radix(id, 16).ok()?;
	let short = BltShortId(id);
	Some((short.dir(), short.res(), code.parse().ok()?))
}

fn run_pack(args: PackArgs) -> Result<()> {
	if !args.input.is_dir() {
		bail!("{} is not a directory", args.input.display());
	}

	let mut resources = Vec::new();
	for entry in fs::read_dir(&args.input)? {
		let path = entry?.path();
		match parse_resource_name(&path) {
			Some(parsed) => resources.push((parsed, path)),
			None => warn!("Skipping {}", path.display()),
		}
	}
	resources.sort_by_key(|((dir, res, _), _)| (*dir, *res));

	let compression = if args.raw {
		Compression::Raw
	} else {
		Compression::Lz
	};

	let mut builder = BoltlibBuilder::new();
	let mut dirs = 0usize;
	for ((dir, res, code), path) in resources {
		while dirs <= dir as usize {
			builder.add_directory();
			dirs += 1;
		}
		let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
		let id = builder.add_resource(dir, code, compression, &data)?;
		if id.res() != res {
			bail!("{} leaves a gap in directory {dir}: expected resource {}", path.display(), id.res());
		}
	}

	builder.save(&args.output).with_context(|| format!("Failed to write {}", args.output.display()))?;
	info!("Packed {dirs} directories into {}", args.output.display());
	Ok(())
}
