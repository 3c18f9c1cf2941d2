pub mod export;
pub mod info;

use std::path::Path;

use anyhow::Context;
use pix_core::SourceFile;

/// Read a file from disk into a loader input named after its file name.
pub fn read_source(path: &Path) -> anyhow::Result<SourceFile> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceFile::new(name, bytes))
}
