//! Where the content of a source file or source map came from.
//!
//! Source files link to source maps by an inline base64 comment, by a
//! comment naming a map file, or implicitly through a `.map` file next to
//! them. Source maps link to source files by embedding them in
//! `sourcesContent` or by naming them in `sources`.

/// Provenance of loaded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Handed to `load_source_file` by the caller.
    Provided,
    /// Extracted from the file that referenced it.
    Inline,
    /// Read from the file system, named explicitly or inferred.
    FileSystem,
}
