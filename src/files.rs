//! Thin async adapters over the filesystem.
//!
//! Every per-file transformation reads and writes through these helpers so the
//! batch runner can keep many files in flight on one thread.

use crate::error::Result;
use std::path::Path;
use tokio::fs;

pub async fn read_text(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path).await?)
}

pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path).await?)
}

pub async fn write_text(path: &Path, data: &str) -> Result<()> {
    Ok(fs::write(path, data).await?)
}

pub async fn write_bytes(path: &Path, data: &[u8]) -> Result<()> {
    Ok(fs::write(path, data).await?)
}

pub async fn remove_file(path: &Path) -> Result<()> {
    Ok(fs::remove_file(path).await?)
}
