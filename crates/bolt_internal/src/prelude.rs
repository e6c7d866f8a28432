//! Prelude module for `bolt_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use bolt_internal::prelude::*;
//!
//! let mut builder = BoltlibBuilder::new();
//! let dir = builder.add_directory();
//! let id = builder.add_resource(dir, BltType::Palette, Compression::Lz, &[0; 6]).unwrap();
//! let mut boltlib = builder.build_file().unwrap();
//! let palette = boltlib.load_palette(id.into()).unwrap();
//! assert_eq!(palette.count(), 1);
//!
//! let mut host = HeadlessHost::new(320, 200);
//! let mut movie = Movie::new(PlayerConfig::default());
//! assert_eq!(movie.handle_msg(&mut host, BoltMsg::Drive), BoltRsp::Pass);
//! ```

// Re-export everything from the member preludes
#[doc(inline)]
pub use bolt_player::prelude::*;
#[doc(inline)]
pub use bolt_types::prelude::*;

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use bolt_player;
#[doc(inline)]
pub use bolt_types;
