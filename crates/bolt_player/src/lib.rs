//! Movie playback engine for BOLT titles.
//!
//! The player demultiplexes PF packet streams, interprets movie timelines
//! and cel sequences, and drives palette effects and audio through the
//! collaborator traits in [`graphics`] and [`audio`]. [`headless`] holds
//! implementations without any device, used by tools and tests.
//!
//! # Examples
//!
//! ```no_run
//! use bolt_player::prelude::*;
//! use bolt_types::file::{PfFile, fourcc};
//!
//! let pf = PfFile::open("MERLIN.PF").unwrap();
//! let mut host = HeadlessHost::new(320, 200);
//! let mut movie = Movie::new(PlayerConfig::default());
//! movie.start_from(&mut host, &pf, fourcc("INTR")).unwrap();
//!
//! while movie.is_running(&mut host) {
//!     host.dispatch(&mut movie, BoltMsg::AddTicks(16));
//! }
//! ```

pub mod audio;
pub mod config;
mod error;
pub mod graphics;
pub mod headless;
pub mod message;
pub mod movie;
pub mod prelude;

pub use config::PlayerConfig;
pub use error::PlayerError;
pub use movie::Movie;
