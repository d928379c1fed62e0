//! Info command - show information about remap.

pub(crate) fn run() -> miette::Result<()> {
    println!("Remap Source Map Flattener");
    println!("==========================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Components:");
    println!("  remap-codec    - VLQ mappings codec");
    println!("  remap-core     - Mapping composition and rendering");
    println!("  remap-loader   - Recursive source and source map loading");
    println!();

    println!("Source map discovery:");
    println!("  Inline data URL comment");
    println!("  External sourceMappingURL comment");
    println!("  Implied <file>.map (disable with --no-implied-maps)");
    println!();

    println!("Environment:");
    println!("  REMAP_SCHEME_MAP       scheme=path[,scheme=path...]");
    println!("  REMAP_INFER_MAP_FILES  0 or false to skip implied maps");

    Ok(())
}
