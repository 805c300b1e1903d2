use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Serialize;
use slice_core::analysis::{extract_functions, resolve};
use slice_core::diagnostics::LogSink;
use slice_core::model::is_infrastructure_marker;

use crate::read_script;

#[derive(Debug, Serialize)]
pub struct DependencyInfo {
    pub name: String,
    /// Whether the script actually defines this function.
    pub defined: bool,
    pub infrastructure: bool,
}

/// Resolve and list the dependency closure of `entries` without assembling.
pub fn dependencies_command(script: &str, entries: &[String], json: bool) -> Result<()> {
    if entries.is_empty() {
        return Err(anyhow!("At least one --entry function is required"));
    }

    let source = read_script(Path::new(script))?;
    let mut sink = LogSink::new();
    let functions = extract_functions(&source, &mut sink);
    let resolved = resolve(&functions, entries);

    let infos: Vec<DependencyInfo> = resolved
        .iter()
        .map(|name| DependencyInfo {
            name: name.clone(),
            defined: functions.contains_key(name),
            infrastructure: is_infrastructure_marker(name),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!("Dependencies ({}):", infos.len());
    for info in infos {
        let mut tags = Vec::new();
        if !info.defined {
            tags.push("missing");
        }
        if info.infrastructure {
            tags.push("psreflect");
        }
        if tags.is_empty() {
            println!("  - {}", info.name);
        } else {
            println!("  - {} [{}]", info.name, tags.join(", "));
        }
    }

    Ok(())
}
