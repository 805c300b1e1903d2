//! Function-level dependency analysis over raw script text.
//!
//! - `extract`: recover function blocks and their names from a script.
//! - `references`: detect which known names a body refers to.
//! - `closure`: compute the transitive dependency set from entry names.

pub mod closure;
pub mod extract;
pub mod references;

pub use closure::{resolve, resolve_bounded};
pub use extract::{declared_function_names, extract_functions};
pub use references::{find_references, ReferenceDetector};
