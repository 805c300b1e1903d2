//! Comment, blank-line, and diagnostic-statement stripping for PowerShell text.
//!
//! Block comments are matched from the first `<#` to the first following `#>`;
//! nested block comments are not balanced.

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<#.*?#>").expect("block comment pattern is valid"));

/// Lowercased statement prefixes whose lines are dropped.
const DIAGNOSTIC_PREFIXES: [&str; 2] = ["write-verbose ", "write-debug "];

/// Strip block comments, line comments, blank lines, and `Write-Verbose` /
/// `Write-Debug` statements.
///
/// Surviving lines keep their original text (indentation included) and order,
/// joined with `\n` and without a trailing newline.
pub fn normalize(text: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(text, "\n");
    without_blocks.split('\n').filter(|line| keep_line(line)).collect::<Vec<_>>().join("\n")
}

fn keep_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    !DIAGNOSTIC_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix))
}
