//! # Remap Core
//!
//! Transitive source map flattening.
//!
//! A generated file may map into files that were themselves generated
//! (A from B, B from C, ...). Each [`SourceFile`] added to a
//! [`SourceFileStore`] composes its own mappings with the already flattened
//! mappings of its sources, so every mapping it holds points straight at an
//! original file.
//!
//! ## Example
//!
//! ```
//! use remap_core::{MapAndPath, MemoryFileSystem, RawSourceMap, SourceFileStore};
//!
//! let mut store = SourceFileStore::new();
//! let original = store.add_pure("/src/a.ts", "let answer = 42;\n");
//! let map = RawSourceMap::from_json(
//!     r#"{"version":3,"sources":["../src/a.ts"],"names":[],"mappings":"AAAA,IAAI"}"#,
//! )
//! .unwrap();
//! let generated = store
//!     .add("/dist/a.js", "var answer = 42;\n", Some(MapAndPath::new(map, None)), vec![Some(original)])
//!     .unwrap();
//!
//! let location = store.original_location(generated, 0, 6).unwrap();
//! assert_eq!((location.line, location.column), (0, 6));
//!
//! let rendered = store.render_flattened_source_map(generated, &MemoryFileSystem::new());
//! assert_eq!(rendered.sources, vec!["../src/a.ts".to_string()]);
//! ```

pub mod comment;
mod error;
mod fs;
mod mapping;
mod raw_map;
mod render;
mod segment;
mod source_file;

pub use error::{CommentError, MappingError};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use mapping::{
    find_last_mapping_index_before, merge_mappings, original_segment_successors, parse_mappings,
    Mapping,
};
pub use raw_map::{MapAndPath, RawSourceMap};
pub use render::RelativePathCache;
pub use segment::{compare_segments, compute_line_starts, offset_segment, SegmentMarker};
pub use source_file::{OriginalLocation, SourceFile, SourceFileId, SourceFileStore};
