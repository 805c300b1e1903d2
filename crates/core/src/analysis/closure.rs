use indexmap::IndexSet;
use tracing::debug;

use crate::analysis::references::ReferenceDetector;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::{DependencySet, FunctionMap};

/// Resolve the transitive set of functions required by `seeds`.
///
/// See [`resolve_bounded`] for the traversal order; this form has no step
/// ceiling and therefore never reports diagnostics.
pub fn resolve<S: AsRef<str>>(functions: &FunctionMap, seeds: &[S]) -> DependencySet {
    let mut unused: Vec<Diagnostic> = Vec::new();
    resolve_bounded(functions, seeds, None, &mut unused)
}

/// Resolve the dependency closure with an optional ceiling on worklist pops.
///
/// Seeds are deduplicated and processed in order, each with its own LIFO
/// worklist, sharing one result set. A name joins the result when it is first
/// discovered, before its own references are expanded, so the result is in
/// discovery order rather than topological order.
///
/// Names without a body (misses or malformed seeds) stay in the result and
/// are only dropped at assembly time. When `max_steps` is reached the partial
/// result, followed by any seeds not yet reached, is returned and a
/// [`Diagnostic::ResolutionLimit`] is reported.
pub fn resolve_bounded<S: AsRef<str>>(
    functions: &FunctionMap,
    seeds: &[S],
    max_steps: Option<usize>,
    sink: &mut dyn DiagnosticSink,
) -> DependencySet {
    let detector = ReferenceDetector::new(functions.keys().cloned());
    let unique_seeds: IndexSet<&str> = seeds.iter().map(AsRef::as_ref).collect();

    let mut resolved = DependencySet::new();
    let mut steps = 0usize;

    for (position, seed) in unique_seeds.iter().enumerate() {
        let mut worklist: Vec<String> = vec![seed.to_string()];

        while let Some(current) = worklist.pop() {
            if let Some(limit) = max_steps {
                if steps >= limit {
                    sink.report(Diagnostic::ResolutionLimit { limit });
                    // Seeds always make it into the result, expanded or not.
                    resolved.extend(unique_seeds.iter().skip(position).map(|s| s.to_string()));
                    return resolved;
                }
            }
            steps += 1;

            let Some(body) = functions.get(&current) else {
                debug!(function = %current, "no extracted body to scan");
                resolved.insert(current);
                continue;
            };
            resolved.insert(current);

            for dependency in detector.find_references(body) {
                // Anything still pending was inserted when it was discovered.
                if resolved.insert(dependency.clone()) {
                    worklist.push(dependency);
                }
            }
        }
    }

    debug!(resolved = resolved.len(), steps, "resolved dependency closure");
    resolved
}
