use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::FunctionMap;
use crate::normalize::normalize;

/// Keywords that open a top-level definition (must start at column 0).
const DEFINITION_KEYWORDS: [&str; 2] = ["function", "filter"];

/// How far into a block the name is looked for.
const NAME_WINDOW_CHARS: usize = 40;

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*((?:function|filter)[ \t]+[^\s{(]+)")
        .expect("declaration pattern is valid")
});

/// Build a map of function name -> normalized body from a script.
///
/// A block starts at a line beginning with `function` or `filter` and ends at
/// the first line after its opening `{` that consists solely of `}`. Blocks do
/// not nest: an unindented `}` always closes the current block. Later
/// definitions of the same name overwrite earlier ones and are reported as
/// [`Diagnostic::DuplicateDefinition`].
pub fn extract_functions(script: &str, sink: &mut dyn DiagnosticSink) -> FunctionMap {
    let lines: Vec<&str> = script.split('\n').collect();
    let mut functions = FunctionMap::new();

    let mut idx = 0;
    while idx < lines.len() {
        if !is_definition_start(lines[idx]) {
            idx += 1;
            continue;
        }
        // Without a closing line here, no later definition can close either.
        let Some(end) = find_block_end(&lines, idx) else {
            debug!(line = idx + 1, "unterminated definition; stopping extraction");
            break;
        };

        let start_line = idx + 1;
        let block = lines[idx..=end].join("\n");
        idx = end + 1;

        let Some(name) = definition_name(&block) else {
            debug!(line = start_line, "definition without a usable name");
            continue;
        };
        if functions.insert(name.clone(), normalize(&block)).is_some() {
            sink.report(Diagnostic::DuplicateDefinition { name });
        }
    }

    debug!(count = functions.len(), "extracted function blocks");
    functions
}

/// Every `function`/`filter` name declared anywhere in the script, indented
/// declarations included, in order of first appearance.
///
/// Names go through the same 40-character window as [`extract_functions`], so
/// a top-level declaration yields exactly the key it was extracted under.
pub fn declared_function_names(script: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in DECLARATION.captures_iter(script) {
        let Some(keyword) = caps.get(1) else { continue };
        let Some(name) = definition_name(&script[keyword.start()..]) else { continue };
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn is_definition_start(line: &str) -> bool {
    DEFINITION_KEYWORDS.iter().any(|keyword| {
        line.strip_prefix(keyword)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_whitespace)
    })
}

fn find_block_end(lines: &[&str], start: usize) -> Option<usize> {
    let open = (start..lines.len()).find(|&i| lines[i].contains('{'))?;
    (open + 1..lines.len()).find(|&i| lines[i].trim_end() == "}")
}

fn definition_name(block: &str) -> Option<String> {
    let window: String = block.chars().take(NAME_WINDOW_CHARS).collect();
    let token = window.split_whitespace().nth(1)?;
    let name = token.split(['{', '(']).next()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
