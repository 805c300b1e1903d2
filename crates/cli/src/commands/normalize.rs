use std::path::Path;

use anyhow::Result;
use slice_core::normalize::normalize;

use crate::{read_script, write_output};

/// Strip comments, blank lines, and verbose/debug statements from a whole script.
pub fn normalize_command(script: &str, output: Option<&str>, force: bool) -> Result<()> {
    let source = read_script(Path::new(script))?;
    let mut normalized = normalize(&source);
    if !normalized.is_empty() {
        normalized.push('\n');
    }

    match output {
        Some(path) => {
            write_output(Path::new(path), &normalized, force)?;
            println!("Normalized script written to {}", path);
        }
        None => print!("{}", normalized),
    }
    Ok(())
}
