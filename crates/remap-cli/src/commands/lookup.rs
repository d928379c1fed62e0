//! Lookup command - show where a generated position came from.

use remap_loader::LoaderConfig;
use std::path::Path;

pub fn run(file: &Path, line: usize, column: usize, config: LoaderConfig) -> miette::Result<()> {
    let (files, id) = super::load(file, config)?;

    match files.original_location(id, line, column) {
        Some(location) => println!(
            "{}:{}:{}",
            location.file.display(),
            location.line,
            location.column
        ),
        None => println!("no mapping"),
    }
    Ok(())
}
