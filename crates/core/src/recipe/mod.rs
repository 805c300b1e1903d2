//! Slice recipes: saved slicing jobs loaded from YAML or JSON.
//!
//! ```yaml
//! name: NetDomain
//! script: PowerView.ps1
//! entries: [Get-NetDomain, Get-NetUser]
//! output: out/netdomain.ps1
//! max_steps: 50000
//! ```
//!
//! Relative `script` / `output` paths resolve against the recipe's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::slicing::SliceRequest;

/// Error type for loading and validating recipes.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Failed to read slice recipe at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse slice recipe JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse slice recipe YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid slice recipe: {0}")]
    Invalid(String),
}

/// On-disk description of one slicing job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRecipe {
    pub name: String,
    /// Source script path.
    pub script: String,
    pub entries: Vec<String>,
    /// Output path for the sliced script; defaults to `<name>.ps1` next to the recipe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SliceRecipe {
    /// Parse a recipe from bytes; `.json` extensions use JSON, anything else YAML.
    pub fn from_slice(bytes: &[u8], path: &Path) -> Result<Self, RecipeError> {
        let recipe: SliceRecipe = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_slice(bytes)?
        } else {
            serde_yaml::from_slice(bytes)?
        };
        recipe.validate()?;
        Ok(recipe)
    }

    /// Read, parse, and validate a recipe file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|source| RecipeError::Io { path: path.to_path_buf(), source })?;
        Self::from_slice(&bytes, path)
    }

    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.name.trim().is_empty() {
            return Err(RecipeError::Invalid("'name' is required".into()));
        }
        if self.script.trim().is_empty() {
            return Err(RecipeError::Invalid("'script' is required".into()));
        }
        if self.entries.is_empty() {
            return Err(RecipeError::Invalid("at least one entry function is required".into()));
        }
        if self.entries.iter().any(|e| e.trim().is_empty()) {
            return Err(RecipeError::Invalid("entry names must not be blank".into()));
        }
        Ok(())
    }

    pub fn request(&self) -> SliceRequest {
        SliceRequest::new(self.entries.iter().cloned()).with_max_steps(self.max_steps)
    }

    /// Script path resolved against `base_dir` (usually the recipe's directory).
    pub fn script_path(&self, base_dir: &Path) -> PathBuf {
        resolve_against(base_dir, &self.script)
    }

    pub fn output_path(&self, base_dir: &Path) -> PathBuf {
        match &self.output {
            Some(output) => resolve_against(base_dir, output),
            None => base_dir.join(format!("{}.ps1", self.name)),
        }
    }
}

fn resolve_against(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
