//! Textual reference detection between function bodies.
//!
//! Matching is over-inclusive: a name counts as referenced when it appears as
//! a standalone token anywhere in the body, including strings and here-strings.
//! Token boundaries are any byte other than an ASCII letter, digit, `_`, or `'`.

use aho_corasick::AhoCorasick;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::model::{INFRASTRUCTURE_MARKERS, NATIVE_MODULE_MARKERS};

static NATIVE_MODULES: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(NATIVE_MODULE_MARKERS)
        .expect("native module markers build an automaton")
});

/// Multi-pattern matcher over a fixed universe of function names.
///
/// Build once per resolution and reuse for every body; the automaton is the
/// expensive part.
#[derive(Debug, Clone)]
pub struct ReferenceDetector {
    names: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl ReferenceDetector {
    pub fn new<I, S>(known_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> =
            known_names.into_iter().map(Into::into).filter(|n| !n.is_empty()).collect();
        let matcher = if names.is_empty() {
            None
        } else {
            match AhoCorasick::builder().ascii_case_insensitive(true).build(&names) {
                Ok(ac) => Some(ac),
                Err(err) => {
                    warn!("Falling back to linear reference scan: {err}");
                    None
                }
            }
        };
        Self { names, matcher }
    }

    pub fn known_names(&self) -> &[String] {
        &self.names
    }

    /// Known names referenced by `body`, in known-name order.
    ///
    /// If the body touches a native module variable (`$Kernel32` etc.), every
    /// infrastructure marker is appended whether or not it is a known name.
    pub fn find_references(&self, body: &str) -> IndexSet<String> {
        let mut hits = vec![false; self.names.len()];
        match &self.matcher {
            Some(ac) => {
                for mat in ac.find_overlapping_iter(body) {
                    if is_token_boundary(body, mat.start(), mat.end()) {
                        hits[mat.pattern().as_usize()] = true;
                    }
                }
            }
            None => self.scan_linear(body, &mut hits),
        }

        let mut references: IndexSet<String> = self
            .names
            .iter()
            .zip(&hits)
            .filter(|(_, hit)| **hit)
            .map(|(name, _)| name.clone())
            .collect();

        if references_native_module(body) {
            references.extend(INFRASTRUCTURE_MARKERS.iter().map(|m| m.to_string()));
        }
        references
    }

    /// Per-name scan used when no automaton could be built.
    fn scan_linear(&self, body: &str, hits: &mut [bool]) {
        let lowered = body.to_ascii_lowercase();
        for (hit, name) in hits.iter_mut().zip(&self.names) {
            let needle = name.to_ascii_lowercase();
            *hit = lowered
                .match_indices(&needle)
                .any(|(start, m)| is_token_boundary(body, start, start + m.len()));
        }
    }
}

/// One-shot form of [`ReferenceDetector::find_references`].
pub fn find_references<S: AsRef<str>>(body: &str, known_names: &[S]) -> IndexSet<String> {
    ReferenceDetector::new(known_names.iter().map(|n| n.as_ref().to_string())).find_references(body)
}

/// True when the body mentions any native module variable.
pub fn references_native_module(body: &str) -> bool {
    NATIVE_MODULES.is_match(body)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'\''
}

fn is_token_boundary(body: &str, start: usize, end: usize) -> bool {
    let bytes = body.as_bytes();
    let before = start == 0 || !is_word_byte(bytes[start - 1]);
    let after = end >= bytes.len() || !is_word_byte(bytes[end]);
    before && after
}
