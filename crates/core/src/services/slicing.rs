use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{extract_functions, resolve_bounded};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{requires_overhead, DependencySet, FunctionMap};
use crate::services::overhead::extract_overhead;

/// Entry functions to slice out of a script, plus an optional safeguard on
/// resolution work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRequest {
    pub entries: Vec<String>,
    /// Ceiling on closure worklist pops; `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

impl SliceRequest {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { entries: entries.into_iter().map(Into::into).collect(), max_steps: None }
    }

    /// A request for one entry function.
    pub fn single(entry: impl Into<String>) -> Self {
        Self { entries: vec![entry.into()], max_steps: None }
    }

    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Result of slicing a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceOutcome {
    /// The assembled, newline-terminated script (empty when nothing resolved).
    pub script: String,
    /// Resolved names in discovery order, including names with no body.
    pub dependencies: DependencySet,
    /// Number of distinct functions extracted from the source script.
    pub extracted_functions: usize,
    /// Whether the resolved set touched the infrastructure markers.
    pub overhead_required: bool,
    /// Whether an overhead block was actually found and appended.
    pub overhead_included: bool,
}

/// Concatenate the bodies of `dependencies` in order and append the overhead
/// block when any infrastructure marker was resolved.
///
/// Names missing from `functions` are skipped with a
/// [`Diagnostic::ExtractionMiss`]. Never fails; output only degrades by
/// omission.
pub fn assemble(
    functions: &FunctionMap,
    dependencies: &DependencySet,
    original: &str,
    sink: &mut dyn DiagnosticSink,
) -> String {
    assemble_parts(functions, dependencies, original, sink).0
}

fn assemble_parts(
    functions: &FunctionMap,
    dependencies: &DependencySet,
    original: &str,
    sink: &mut dyn DiagnosticSink,
) -> (String, bool) {
    let mut script = String::new();
    for name in dependencies {
        match functions.get(name) {
            Some(body) => {
                script.push_str(body);
                script.push('\n');
            }
            None => sink.report(Diagnostic::ExtractionMiss { name: name.clone() }),
        }
    }

    let mut overhead_included = false;
    if requires_overhead(dependencies) {
        let overhead = extract_overhead(original, sink);
        if !overhead.is_empty() {
            script.push_str(&overhead);
            overhead_included = true;
        }
    }

    if !script.is_empty() {
        script.push('\n');
    }
    (script, overhead_included)
}

/// Run extraction, closure resolution, and assembly for one request.
pub fn slice_script(
    script: &str,
    request: &SliceRequest,
    sink: &mut dyn DiagnosticSink,
) -> SliceOutcome {
    let functions = extract_functions(script, sink);
    let dependencies = resolve_bounded(&functions, &request.entries, request.max_steps, sink);
    let overhead_required = requires_overhead(&dependencies);
    let (output, overhead_included) = assemble_parts(&functions, &dependencies, script, sink);

    debug!(
        entries = request.entries.len(),
        resolved = dependencies.len(),
        bytes = output.len(),
        "sliced script"
    );

    SliceOutcome {
        script: output,
        dependencies,
        extracted_functions: functions.len(),
        overhead_required,
        overhead_included,
    }
}
