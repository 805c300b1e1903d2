use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use slice_core::diagnostics::{Diagnostic, LogSink};
use slice_core::services::slicing::{slice_script, SliceOutcome, SliceRequest};

use crate::{ensure_writable, read_script, sha256_bytes, write_output};

/// JSON report describing one slicing run.
#[derive(Debug, Serialize, Deserialize)]
pub struct SliceReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub script: String,
    pub script_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_hash: Option<String>,
    pub entries: Vec<String>,
    /// Resolved names in discovery order.
    pub functions: Vec<String>,
    /// Resolved names that had no extracted body.
    pub missing: Vec<String>,
    pub extracted_functions: usize,
    pub overhead_required: bool,
    pub overhead_included: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub started_at: String,
    pub finished_at: String,
}

impl SliceReport {
    pub fn from_outcome(
        script_path: &Path,
        script_hash: String,
        request: &SliceRequest,
        outcome: &SliceOutcome,
        diagnostics: Vec<Diagnostic>,
        started_at: String,
    ) -> Self {
        let missing = diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::ExtractionMiss { name } => Some(name.clone()),
                _ => None,
            })
            .collect();
        Self {
            name: None,
            script: script_path.display().to_string(),
            script_hash,
            recipe_hash: None,
            entries: request.entries.clone(),
            functions: outcome.dependencies.iter().cloned().collect(),
            missing,
            extracted_functions: outcome.extracted_functions,
            overhead_required: outcome.overhead_required,
            overhead_included: outcome.overhead_included,
            diagnostics,
            started_at,
            finished_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Slice `entries` (and everything they depend on) out of a script.
///
/// The sliced script goes to `output` when given, otherwise to stdout.
pub fn slice_command(
    script: &str,
    entries: &[String],
    output: Option<&str>,
    report: Option<&str>,
    max_steps: Option<usize>,
    force: bool,
) -> Result<()> {
    if entries.is_empty() {
        return Err(anyhow!("At least one --entry function is required"));
    }

    let targets: Vec<&Path> = output.iter().chain(report.iter()).map(Path::new).collect();
    ensure_writable(&targets, force)?;

    let script_path = Path::new(script);
    let source = read_script(script_path)?;
    let started_at = Utc::now().to_rfc3339();

    let request = SliceRequest::new(entries.iter().cloned()).with_max_steps(max_steps);
    let mut sink = LogSink::new();
    let outcome = slice_script(&source, &request, &mut sink);

    match output {
        Some(path) => {
            let out_path = Path::new(path);
            write_output(out_path, &outcome.script, force)?;
            println!("Sliced script:");
            println!("  Source: {}", script_path.display());
            println!("  Entries: {:?}", request.entries);
            println!("  Functions: {}", outcome.dependencies.len());
            println!("  Overhead: {}", if outcome.overhead_included { "yes" } else { "no" });
            println!("  Output: {}", out_path.display());
        }
        None => print!("{}", outcome.script),
    }

    if let Some(path) = report {
        let report = SliceReport::from_outcome(
            script_path,
            sha256_bytes(source.as_bytes()),
            &request,
            &outcome,
            sink.into_diagnostics(),
            started_at,
        );
        let serialized =
            serde_json::to_string_pretty(&report).context("Failed to serialize slice report")?;
        write_output(Path::new(path), &serialized, force)?;
    }

    Ok(())
}
