//! CLI commands.

use remap_core::{OsFileSystem, SourceFileId, SourceFileStore};
use remap_loader::{LoaderConfig, SourceFileLoader};
use std::path::{Path, PathBuf};

pub mod flatten;
pub mod info;
pub mod lookup;

/// Load `file` and everything its source maps lead to.
fn load(file: &Path, config: LoaderConfig) -> miette::Result<(SourceFileStore, SourceFileId)> {
    let path = absolute(file)?;
    let fs = OsFileSystem;
    let mut loader = SourceFileLoader::new(&fs, config);
    let id = loader
        .load_source_file(&path, None, None)
        .map_err(|e| miette::miette!("{}", e))?
        .ok_or_else(|| miette::miette!("Failed to load {}", file.display()))?;
    Ok((loader.into_files(), id))
}

fn absolute(file: &Path) -> miette::Result<PathBuf> {
    if file.is_absolute() {
        return Ok(file.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to read current directory: {}", e))?;
    Ok(cwd.join(file))
}
