//! Benchmark helper utilities for bolt-rs
//!
//! Generates synthetic resource data shaped like real game assets:
//! images with long runs and repeated rows, which exercise every BOLT-LZ
//! command, and noise, which mostly produces literal runs.

/// Generates an indexed image with horizontal bands and a repeating pattern
///
/// Bands compress to fills, the pattern to back references.
pub fn generate_image_data(width: usize, height: usize) -> Vec<u8> {
	let mut data = Vec::with_capacity(width * height);
	for y in 0..height {
		for x in 0..width {
			let pixel = if (y / 16) % 2 == 0 {
				(y / 16) as u8 & 0x7F
			} else {
				((x % 24) as u8).wrapping_add(y as u8 % 3)
			};
			data.push(pixel);
		}
	}
	data
}

/// Generates pseudo-random bytes with a fixed seed
pub fn generate_noise(len: usize) -> Vec<u8> {
	let mut state = 0x2545_F491_u32;
	(0..len)
		.map(|_| {
			// xorshift32
			state ^= state << 13;
			state ^= state >> 17;
			state ^= state << 5;
			(state >> 24) as u8
		})
		.collect()
}

/// Common benchmark sizes for synthetic data
pub mod sizes {
	/// Cel sized image: 64x64
	pub const CEL: (usize, usize) = (64, 64);
	/// Half screen: 320x240
	pub const HALF_SCREEN: (usize, usize) = (320, 240);
	/// Full screen background: 640x480
	pub const SCREEN: (usize, usize) = (640, 480);
	/// Scrolling background: 1280x480
	pub const PANORAMA: (usize, usize) = (1280, 480);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_image_data() {
		let data = generate_image_data(32, 32);
		assert_eq!(data.len(), 1024);
		assert!(data[..32].iter().all(|&p| p == 0));
		assert_ne!(data[16 * 32], data[16 * 32 + 1]);
	}

	#[test]
	fn test_generate_noise_is_deterministic() {
		assert_eq!(generate_noise(64), generate_noise(64));
		assert_eq!(generate_noise(1000).len(), 1000);
	}
}
