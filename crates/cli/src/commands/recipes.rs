use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use slice_core::diagnostics::LogSink;
use slice_core::recipe::SliceRecipe;
use slice_core::services::slicing::slice_script;
use tracing::warn;

use crate::commands::SliceReport;
use crate::{ensure_writable, read_script, sha256_bytes, write_output};

#[derive(Debug, Serialize, Clone)]
pub struct RecipeInfo {
    pub name: String,
    pub script: String,
    pub entries: Vec<String>,
    pub path: String,
    pub format: String,
}

/// Path of the run metadata written next to a recipe's output.
pub fn run_metadata_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".run.json");
    output.with_file_name(name)
}

/// Run a slice recipe: slice the configured script and write the output plus
/// `<output>.run.json` metadata.
pub fn run_recipe_command(file: &str, force: bool) -> Result<()> {
    let recipe_path = Path::new(file);
    let recipe_bytes = fs::read(recipe_path)
        .with_context(|| format!("Failed to read slice recipe at {}", recipe_path.display()))?;
    let recipe_hash = sha256_bytes(&recipe_bytes);
    let recipe = SliceRecipe::from_slice(&recipe_bytes, recipe_path)
        .with_context(|| format!("Failed to load slice recipe {}", recipe_path.display()))?;

    let base_dir = recipe_path.parent().unwrap_or_else(|| Path::new("."));
    let script_path = recipe.script_path(base_dir);
    let output_path = recipe.output_path(base_dir);
    let metadata_path = run_metadata_path(&output_path);
    ensure_writable(&[output_path.as_path(), metadata_path.as_path()], force)?;

    let source = read_script(&script_path)?;
    let started_at = Utc::now().to_rfc3339();
    let request = recipe.request();
    let mut sink = LogSink::new();
    let outcome = slice_script(&source, &request, &mut sink);

    write_output(&output_path, &outcome.script, force)?;

    let mut report = SliceReport::from_outcome(
        &script_path,
        sha256_bytes(source.as_bytes()),
        &request,
        &outcome,
        sink.into_diagnostics(),
        started_at,
    );
    report.name = Some(recipe.name.clone());
    report.recipe_hash = Some(recipe_hash);
    let serialized =
        serde_json::to_string_pretty(&report).context("Failed to serialize run metadata")?;
    write_output(&metadata_path, &serialized, force)?;

    println!("Ran slice recipe: {}", recipe.name);
    println!("  Script: {}", script_path.display());
    println!("  Entries: {:?}", recipe.entries);
    println!("  Functions: {}", outcome.dependencies.len());
    if !report.missing.is_empty() {
        println!("  Missing: {:?}", report.missing);
    }
    println!("  Output: {}", output_path.display());
    println!("  Metadata: {}", metadata_path.display());

    Ok(())
}

/// Discover slice recipes (yaml/yml/json) in a directory. Files that fail to
/// parse are skipped with a warning.
pub fn collect_recipes(dir: &Path) -> Result<Vec<RecipeInfo>> {
    let mut recipes = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let entry_path = entry.path();
        let ext =
            entry_path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_string();
        if !matches!(ext.as_str(), "yaml" | "yml" | "json") {
            continue;
        }
        match SliceRecipe::load(&entry_path) {
            Ok(recipe) => recipes.push(RecipeInfo {
                name: recipe.name,
                script: recipe.script,
                entries: recipe.entries,
                path: entry_path.display().to_string(),
                format: ext,
            }),
            Err(err) => warn!("Skipping {}: {err}", entry_path.display()),
        }
    }

    recipes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(recipes)
}

pub fn list_recipes_command(dir: &str, json: bool) -> Result<()> {
    let recipes = collect_recipes(Path::new(dir))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    println!("Slice recipes ({}):", recipes.len());
    if recipes.is_empty() {
        println!("  (none)");
    }
    for recipe in recipes {
        println!(
            "  - {} [{}] script={} entries={:?}",
            recipe.name, recipe.format, recipe.script, recipe.entries
        );
    }
    Ok(())
}
