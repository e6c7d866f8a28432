//! This module is separated into its own crate to enable simple dynamic linking for `bolt_rs`, and should not be used directly.

/// `use bolt_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use bolt_player;
pub use bolt_types;

// Re-export commonly used types at crate root
pub use bolt_player::{Movie, PlayerConfig, PlayerError};
pub use bolt_types::file::{BoltError, BoltlibFile, PfFile};
