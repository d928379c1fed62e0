//! Flatten command - write the flattened source map of a file.

use remap_core::comment::inline_map_comment;
use remap_core::OsFileSystem;
use remap_loader::LoaderConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub fn run(
    file: &Path,
    output: Option<&Path>,
    inline: bool,
    config: LoaderConfig,
) -> miette::Result<()> {
    let (files, id) = super::load(file, config)?;
    let map = files.render_flattened_source_map(id, &OsFileSystem);

    if inline {
        let comment = inline_map_comment(&map)
            .map_err(|e| miette::miette!("Failed to encode source map: {}", e))?;
        let contents = files[id].contents();
        print!("{contents}");
        if !contents.is_empty() && !contents.ends_with('\n') {
            println!();
        }
        println!("{comment}");
        return Ok(());
    }

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let mut path = file.as_os_str().to_owned();
        path.push(".map");
        PathBuf::from(path)
    });
    let json = map
        .to_json()
        .map_err(|e| miette::miette!("Failed to encode source map: {}", e))?;
    fs::write(&output, json)
        .map_err(|e| miette::miette!("Failed to write {}: {}", output.display(), e))?;

    println!(
        "Wrote {} ({} sources, {} mappings)",
        output.display(),
        map.sources.len(),
        files[id].flattened_mappings().len()
    );
    Ok(())
}
