//! Higher-level services built on the analysis layer.
//!
//! - `overhead`: locate the PSReflect scaffolding block in a script.
//! - `slicing`: assemble resolved functions into the final script and run the
//!   whole extract -> resolve -> assemble pipeline.

pub mod overhead;
pub mod slicing;
