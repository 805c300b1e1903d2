use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::ScriptFamily;
use crate::normalize::normalize;

// Both spans are greedy: they run to the last closing anchor in the script.
static POWERUP_OVERHEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\n\$Module =.*\['kernel32'\]").expect("PowerUp overhead pattern is valid")
});

static POWERVIEW_OVERHEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\n\$Mod =.*\['wtsapi32'\]").expect("PowerView overhead pattern is valid")
});

fn overhead_pattern(family: ScriptFamily) -> &'static Regex {
    match family {
        ScriptFamily::PowerUp => &*POWERUP_OVERHEAD,
        ScriptFamily::PowerView => &*POWERVIEW_OVERHEAD,
    }
}

/// Extract and normalize the PSReflect overhead block of `script`.
///
/// Returns an empty string (and reports [`Diagnostic::OverheadNotFound`]) when
/// the family's anchors do not match.
pub fn extract_overhead(script: &str, sink: &mut dyn DiagnosticSink) -> String {
    let family = ScriptFamily::detect(script);
    match overhead_pattern(family).find(script) {
        Some(span) => {
            debug!(%family, start = span.start(), end = span.end(), "located overhead block");
            normalize(span.as_str())
        }
        None => {
            sink.report(Diagnostic::OverheadNotFound { family });
            String::new()
        }
    }
}
