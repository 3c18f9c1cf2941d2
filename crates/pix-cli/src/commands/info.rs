//! Show image information.

use std::path::{Path, PathBuf};

use pix_core::asset::load_file;
use pix_core::{AssetId, NoHeifConverter};

use super::read_source;

pub fn run(files: &[PathBuf]) -> anyhow::Result<()> {
    for (index, path) in files.iter().enumerate() {
        println!("{}", describe(index, path)?);
    }
    Ok(())
}

/// One line per file: name, dimensions, and ratio, or the load error.
fn describe(index: usize, path: &Path) -> anyhow::Result<String> {
    let source = read_source(path)?;
    Ok(
        match load_file(&source, &NoHeifConverter, AssetId::new(index as u64)) {
            Ok(asset) => format!(
                "{}: {}x{} (ratio {:.4})",
                asset.name(),
                asset.width(),
                asset.height(),
                asset.ratio()
            ),
            Err(err) => format!("{}: error: {}", source.name, err),
        },
    )
}
