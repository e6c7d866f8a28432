#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `bolt-rs` plays the movies of BOLT engine games such as Merlin's Apprentice.
//!
//! The crate bundles the `BOLTLIB` resource container, the `PF` movie
//! demuxer and a host-agnostic movie player.
//!
//! ```no_run
//! use bolt_rs::prelude::*;
//!
//! # fn main() -> Result<(), PlayerError> {
//! let pf = PfFile::open("MERLIN.PF")?;
//! let mut host = HeadlessHost::new(640, 480);
//! let mut movie = Movie::new(PlayerConfig::default());
//! movie.start_from(&mut host, &pf, fourcc("INTR"))?;
//! while movie.is_running(&mut host) {
//! 	host.dispatch(&mut movie, BoltMsg::AddTicks(16));
//! 	host.dispatch_pending(&mut movie);
//! }
//! # Ok(())
//! # }
//! ```
pub use bolt_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use bolt_dylib;
