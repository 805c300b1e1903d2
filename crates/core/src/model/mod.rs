//! Core data model shared by extraction, resolution, and assembly.
//!
//! Function names are case-sensitive identities; reference matching against
//! them is case-insensitive (see `analysis::references`).

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Mapping from function name to its normalized source block.
///
/// Insertion order is kept so repeated extraction of the same script is
/// deterministic. Re-inserting a name overwrites the body in place.
pub type FunctionMap = IndexMap<String, String>;

/// Insertion-ordered, duplicate-free set of resolved function names.
///
/// Order is discovery order, not a topological order.
pub type DependencySet = IndexSet<String>;

/// PSReflect helper functions that are gated as a unit.
///
/// When any of these ends up in a resolved set, the overhead block is appended.
pub const INFRASTRUCTURE_MARKERS: [&str; 5] =
    ["New-InMemoryModule", "func", "Add-Win32Type", "psenum", "struct"];

/// Native module variables whose presence in a body pulls in every
/// infrastructure marker. Matched case-insensitively.
pub const NATIVE_MODULE_MARKERS: [&str; 4] = ["$Netapi32", "$Advapi32", "$Kernel32", "$Wtsapi32"];

/// Returns true when `name` is one of the infrastructure markers (exact match).
pub fn is_infrastructure_marker(name: &str) -> bool {
    INFRASTRUCTURE_MARKERS.contains(&name)
}

/// Returns true when any resolved name is an infrastructure marker.
pub fn requires_overhead(dependencies: &DependencySet) -> bool {
    dependencies.iter().any(|name| is_infrastructure_marker(name))
}

/// Known script families that carry a PSReflect overhead block.
///
/// The family decides which anchors delimit the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptFamily {
    PowerUp,
    PowerView,
}

impl ScriptFamily {
    /// Number of leading characters inspected when detecting the family.
    pub const HEADER_CHARS: usize = 100;

    /// Detect the family from the script header; anything not marked as
    /// PowerUp is treated as PowerView.
    pub fn detect(script: &str) -> Self {
        let header = match script.char_indices().nth(Self::HEADER_CHARS) {
            Some((idx, _)) => &script[..idx],
            None => script,
        };
        if header.contains("PowerUp") {
            ScriptFamily::PowerUp
        } else {
            ScriptFamily::PowerView
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptFamily::PowerUp => "PowerUp",
            ScriptFamily::PowerView => "PowerView",
        }
    }
}

impl std::fmt::Display for ScriptFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
