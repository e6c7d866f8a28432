//! Commonly used player types.

#[doc(inline)]
pub use crate::{
	PlayerConfig, PlayerError,
	audio::AudioSink,
	graphics::{Graphics, ImageRef, PaletteSink, Plane, Ratio, Surface},
	headless::{HeadlessHost, HeadlessMixer, HeadlessPalette, HeadlessSurface},
	message::{BoltMsg, BoltRsp},
	movie::{Movie, MovieHost, PlaybackMode},
};
