pub mod commands;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};

/// Read a script file as UTF-8 text.
pub fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read script at {}", path.display()))
}

/// Fail if any of `paths` already exists, unless `force` is set.
///
/// Commands that write several files call this before writing the first one.
pub fn ensure_writable(paths: &[&Path], force: bool) -> Result<()> {
    if force {
        return Ok(());
    }
    match paths.iter().find(|p| p.exists()) {
        Some(existing) => Err(anyhow!(
            "Output already exists at {} (rerun with --force to overwrite)",
            existing.display()
        )),
        None => Ok(()),
    }
}

/// Write `contents` to `path`, creating parent directories as needed.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_output(path: &Path, contents: &str, force: bool) -> Result<()> {
    ensure_writable(&[path], force)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output dir {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// SHA-256 of a byte slice as a lowercase hex string.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
