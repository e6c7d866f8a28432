//! Messages exchanged between the engine loop and its handlers.
//!
//! The engine delivers messages one at a time as they are received rather
//! than ticking at a fixed rate.

use serde::Serialize;

/// Message sent by the engine to the active handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoltMsg {
	/// Present a new frame and gather more input
	Yield,
	/// Run handlers with no particular event
	Drive,
	/// Pointer moved
	Hover {
		/// Pointer x
		x: i16,
		/// Pointer y
		y: i16,
	},
	/// Left click
	Click {
		/// Pointer x
		x: i16,
		/// Pointer y
		y: i16,
	},
	/// Right click
	RightClick {
		/// Pointer x
		x: i16,
		/// Pointer y
		y: i16,
	},
	/// Milliseconds elapsed since the previous tick message
	AddTicks(u32),
	/// Engine timer fired
	Timer(u32),
	/// A sound finished playing
	AudioEnded,
	/// Extra frame for smooth animation such as fades
	SmoothAnimation,
	/// Game-defined message
	Scene(u32),
}

/// Response of a handler to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoltRsp {
	/// Message was handled
	Done,
	/// Message was not handled and should go to the next handler
	Pass,
}
