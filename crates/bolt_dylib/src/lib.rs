//! Forces dynamic linking of `bolt_internal` when the `dynamic_linking`
//! feature of `bolt-rs` is enabled. Not meant to be used directly.

#[allow(unused_imports)]
use bolt_internal;
