//! Resource type codes stored in BOLTLIB resource entries.

use std::fmt::Display;

use serde::Serialize;

/// Resource types known from the Merlin title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum BltType {
	/// Array of unsigned bytes
	U8Values = 1,
	/// Array of signed big-endian 16-bit values
	S16Values = 2,
	/// Array of unsigned big-endian 16-bit values
	U16Values = 3,
	/// Array of long resource ids
	ResourceList = 6,
	/// Raw unsigned 8-bit PCM
	Sound = 7,
	/// Bitmap image
	Image = 8,
	/// Palette with first/last header
	Palette = 10,
	/// Set of up to four color cycle slots
	ColorCycles = 11,
	/// Single color cycle slot
	ColorCycleSlot = 12,
	/// Inclusive rectangle
	Rect = 24,
	/// Image, palette and hotspots
	Plane = 26,
	/// Sprite list: image, x, y
	SpriteList = 27,
	/// Bare RGB triples referenced by palette mods
	Colors = 28,
	/// Palette modification list
	PaletteMods = 29,
	/// Button graphics list
	ButtonGraphicsList = 30,
	/// Button list
	ButtonList = 31,
	/// Scene
	Scene = 32,
	/// Main menu
	MainMenu = 33,
	/// File menu
	FileMenu = 34,
	/// Popup
	Popup = 37,
	/// Popup catalog
	PopupCatalog = 38,
	/// Hub card
	Hub = 40,
	/// Hub item
	HubItem = 41,
	/// Sliding puzzle
	SlidingPuzzle = 44,
	/// Action puzzle particle deaths
	ParticleDeaths = 45,
	/// Action puzzle particles
	Particles = 46,
	/// Word puzzle
	WordPuzzleInfo = 48,
	/// Word puzzle variant
	WordPuzzleVariantInfo = 49,
	/// Tangram puzzle difficulty
	TangramPuzzleDifficultyInfo = 51,
	/// Synch puzzle
	SynchPuzzleInfo = 52,
	/// Synch puzzle transition
	SynchPuzzleTransition = 53,
	/// Memory puzzle infos
	MemoryPuzzleInfos = 54,
	/// Memory puzzle item frame list
	MemoryPuzzleItemFrameList = 55,
	/// Memory puzzle item list
	MemoryPuzzleItemList = 56,
	/// Color puzzle transition
	ColorPuzzleTransition = 58,
	/// Potion puzzle
	PotionPuzzle = 59,
	/// Potion puzzle sprite points
	PotionPuzzleSpritePoints = 60,
	/// Potion puzzle difficulty
	PotionPuzzleDifficulty = 61,
	/// Potion puzzle combo table list
	PotionPuzzleComboTableList = 62,
	/// Potion puzzle combo table
	PotionPuzzleComboTable = 63,
}

impl BltType {
	const ALL: [BltType; 40] = [
		BltType::U8Values,
		BltType::S16Values,
		BltType::U16Values,
		BltType::ResourceList,
		BltType::Sound,
		BltType::Image,
		BltType::Palette,
		BltType::ColorCycles,
		BltType::ColorCycleSlot,
		BltType::Rect,
		BltType::Plane,
		BltType::SpriteList,
		BltType::Colors,
		BltType::PaletteMods,
		BltType::ButtonGraphicsList,
		BltType::ButtonList,
		BltType::Scene,
		BltType::MainMenu,
		BltType::FileMenu,
		BltType::Popup,
		BltType::PopupCatalog,
		BltType::Hub,
		BltType::HubItem,
		BltType::SlidingPuzzle,
		BltType::ParticleDeaths,
		BltType::Particles,
		BltType::WordPuzzleInfo,
		BltType::WordPuzzleVariantInfo,
		BltType::TangramPuzzleDifficultyInfo,
		BltType::SynchPuzzleInfo,
		BltType::SynchPuzzleTransition,
		BltType::MemoryPuzzleInfos,
		BltType::MemoryPuzzleItemFrameList,
		BltType::MemoryPuzzleItemList,
		BltType::ColorPuzzleTransition,
		BltType::PotionPuzzle,
		BltType::PotionPuzzleSpritePoints,
		BltType::PotionPuzzleDifficulty,
		BltType::PotionPuzzleComboTableList,
		BltType::PotionPuzzleComboTable,
	];

	/// Looks up a known type by its numeric code
	pub fn from_code(code: u32) -> Option<Self> {
		Self::ALL.iter().copied().find(|t| *t as u32 == code)
	}

	/// Numeric code stored in resource entries
	pub const fn code(self) -> u32 {
		self as u32
	}
}

impl From<BltType> for u32 {
	fn from(value: BltType) -> Self {
		value.code()
	}
}

impl Display for BltType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?} ({})", self, self.code())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_code_lookup() {
		assert_eq!(BltType::from_code(10), Some(BltType::Palette));
		assert_eq!(BltType::from_code(63), Some(BltType::PotionPuzzleComboTable));
		assert_eq!(BltType::from_code(4), None);
		assert_eq!(u32::from(BltType::Sound), 7);
	}
}
