//! Benchmark suite for BOLTLIB resource loading
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use bolt_benches::{generate_image_data, sizes};
use bolt_types::file::{BltType, BoltlibBuilder, Compression};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Resources of one directory, loaded in order through a cold table cache
fn bench_load_resources(c: &mut Criterion) {
	let mut group = c.benchmark_group("boltlib_load");

	let raw = generate_image_data(sizes::HALF_SCREEN.0, sizes::HALF_SCREEN.1);
	for compression in [Compression::Lz, Compression::Raw] {
		let mut builder = BoltlibBuilder::new();
		let dir = builder.add_directory();
		let mut ids = Vec::new();
		for _ in 0..16 {
			match builder.add_resource(dir, BltType::U8Values, compression, &raw) {
				Ok(id) => ids.push(id),
				Err(e) => {
					eprintln!("Warning: Could not build container: {e}");
					return;
				}
			}
		}
		let bytes = builder.to_bytes();

		group.throughput(Throughput::Bytes((raw.len() * ids.len()) as u64));
		group.bench_with_input(
			BenchmarkId::new("directory", format!("{compression:?}")),
			&bytes,
			|b, bytes| {
				b.iter(|| {
					let Ok(mut file) =
						bolt_types::file::BoltlibFile::from_reader(std::io::Cursor::new(bytes.as_slice()))
					else {
						return;
					};
					for &id in &ids {
						let result = file.load_resource(id.into(), BltType::U8Values);
						black_box(result.ok());
					}
				});
			},
		);
	}

	group.finish();
}

/// Header and directory parsing only
fn bench_open_container(c: &mut Criterion) {
	let mut group = c.benchmark_group("boltlib_open");

	let mut builder = BoltlibBuilder::new();
	for _ in 0..64 {
		let dir = builder.add_directory();
		for value in 0..8u8 {
			if builder.add_resource(dir, BltType::U8Values, Compression::Raw, &[value; 4]).is_err() {
				return;
			}
		}
	}
	let bytes = builder.to_bytes();

	group.bench_function("open_64_dirs", |b| {
		b.iter(|| {
			let result = bolt_types::file::BoltlibFile::from_reader(std::io::Cursor::new(black_box(&bytes)));
			black_box(result.is_ok())
		});
	});

	group.finish();
}

criterion_group!(benches, bench_load_resources, bench_open_container);

criterion_main!(benches);
