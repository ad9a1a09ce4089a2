use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Directory holding config and cached credentials.
///
/// `SPENDSHEET_HOME` wins; otherwise `~/.spendsheet`.
pub fn spendsheet_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("SPENDSHEET_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendsheet"))
}

pub fn ensure_home() -> Result<PathBuf> {
    let dir = spendsheet_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
