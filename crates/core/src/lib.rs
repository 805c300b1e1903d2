//! slice-core
//!
//! Core library for dependency-closure slicing of large PowerShell library scripts.
//!
//! Given a script full of `function`/`filter` definitions and a handful of entry
//! names, this crate recovers function boundaries heuristically, resolves the
//! transitive set of functions the entries reference, and assembles a minimal
//! script (plus the PSReflect overhead block when native interop is needed).
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends. Apart from loading recipes, the crate performs no file I/O.

pub mod model;
pub mod normalize;
pub mod analysis;
pub mod services;
pub mod diagnostics;
pub mod recipe;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
