//! # Remap Loader
//!
//! Loads a generated file, follows its source map to the files it was
//! generated from, and repeats until it reaches files without maps. The
//! result is a [`SourceFileStore`](remap_core::SourceFileStore) whose
//! top-level file maps straight to the original sources.
//!
//! Maps are found in an inline base64 comment, in a file named by a
//! `sourceMappingURL` comment, or in a `<file>.map` next to the file.
//! Failures below the top level are logged and leave a gap; only a
//! circular dependency between files aborts the load.

mod config;
mod error;
mod loader;
mod origin;

pub use config::{parse_scheme_entry, LoaderConfig, LoaderConfigBuilder};
pub use error::LoadError;
pub use loader::SourceFileLoader;
pub use origin::ContentOrigin;
