//! Benchmark suite for BOLT-LZ
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use bolt_benches::{generate_image_data, generate_noise, sizes};
use bolt_types::file::boltlib::lz;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Decompression of image-like data at several sizes
fn bench_decompress_images(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz_decompress_image");

	for (name, (width, height)) in [
		("cel", sizes::CEL),
		("half_screen", sizes::HALF_SCREEN),
		("screen", sizes::SCREEN),
		("panorama", sizes::PANORAMA),
	] {
		let raw = generate_image_data(width, height);
		let compressed = lz::compress(&raw);

		group.throughput(Throughput::Bytes(raw.len() as u64));
		group.bench_with_input(BenchmarkId::new("decompress", name), &compressed, |b, compressed| {
			b.iter(|| {
				let result = lz::decompress_to_vec(black_box(compressed), raw.len());
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Decompression of literal-heavy data
fn bench_decompress_noise(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz_decompress_noise");

	let raw = generate_noise(64 * 1024);
	let compressed = lz::compress(&raw);

	group.throughput(Throughput::Bytes(raw.len() as u64));
	group.bench_function("decompress", |b| {
		let mut output = vec![0u8; raw.len()];
		b.iter(|| {
			let result = lz::decompress(black_box(&compressed), &mut output);
			black_box(result)
		});
	});

	group.finish();
}

/// Reference encoder, used when packing containers
fn bench_compress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz_compress");
	group.sample_size(20);

	let raw = generate_image_data(sizes::SCREEN.0, sizes::SCREEN.1);
	group.throughput(Throughput::Bytes(raw.len() as u64));
	group.bench_function("compress_screen", |b| {
		b.iter(|| black_box(lz::compress(black_box(&raw))));
	});

	group.finish();
}

criterion_group!(benches, bench_decompress_images, bench_decompress_noise, bench_compress);

criterion_main!(benches);
