use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use slice_core::analysis::{declared_function_names, extract_functions};
use slice_core::diagnostics::LogSink;

use crate::read_script;

#[derive(Debug, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    /// Line count of the normalized body.
    pub lines: usize,
}

#[derive(Debug, Serialize)]
pub struct FunctionListing {
    pub functions: Vec<FunctionInfo>,
    /// Declarations the block extractor did not capture (nested or indented).
    pub unextracted: Vec<String>,
}

pub fn collect_function_listing(source: &str) -> FunctionListing {
    let mut sink = LogSink::new();
    let functions = extract_functions(source, &mut sink);
    let unextracted = declared_function_names(source)
        .into_iter()
        .filter(|name| !functions.contains_key(name))
        .collect();
    FunctionListing {
        functions: functions
            .iter()
            .map(|(name, body)| FunctionInfo { name: name.clone(), lines: body.lines().count() })
            .collect(),
        unextracted,
    }
}

/// List the functions the extractor recovers from a script.
pub fn list_functions_command(script: &str, json: bool) -> Result<()> {
    let source = read_script(Path::new(script))?;
    let listing = collect_function_listing(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Functions ({}):", listing.functions.len());
    if listing.functions.is_empty() {
        println!("  (none)");
    }
    for func in &listing.functions {
        println!("  - {} ({} lines)", func.name, func.lines);
    }
    if !listing.unextracted.is_empty() {
        println!("Declared but not extracted ({}):", listing.unextracted.len());
        for name in &listing.unextracted {
            println!("  - {}", name);
        }
    }

    Ok(())
}
