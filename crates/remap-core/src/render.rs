//! Serialise flattened mappings back into a source map.

use indexmap::{IndexMap, IndexSet};
use remap_codec::RawSegment;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::path::{Path, PathBuf};

use crate::fs::FileSystem;
use crate::raw_map::RawSourceMap;
use crate::source_file::{SourceFileId, SourceFileStore};

/// Memoised relative paths from one directory.
///
/// Lives for a single render; most mappings share a handful of sources.
pub struct RelativePathCache<'a> {
    fs: &'a dyn FileSystem,
    base: PathBuf,
    paths: FxHashMap<PathBuf, String>,
}

impl<'a> RelativePathCache<'a> {
    pub fn new(fs: &'a dyn FileSystem, base: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            base: base.into(),
            paths: FxHashMap::default(),
        }
    }

    /// `path` relative to the cache's base directory.
    pub fn get(&mut self, path: &Path) -> &str {
        let fs = self.fs;
        let base = &self.base;
        self.paths
            .entry(path.to_path_buf())
            .or_insert_with(|| fs.relative(base, path))
    }
}

impl SourceFileStore {
    /// Build a source map from the generated file `id` straight to the
    /// original files its flattened mappings reference.
    ///
    /// Sources are listed relative to the generated file's directory, in
    /// the order they are first used, with their contents inlined.
    pub fn render_flattened_source_map(&self, id: SourceFileId, fs: &dyn FileSystem) -> RawSourceMap {
        let file = &self[id];
        let mut relative_paths = RelativePathCache::new(fs, fs.dirname(file.path()));
        let mut sources: IndexMap<String, String> = IndexMap::new();
        let mut names: IndexSet<SmolStr> = IndexSet::new();
        let mut lines: Vec<Vec<RawSegment>> = Vec::new();

        for mapping in file.flattened_mappings() {
            let original = &self[mapping.original_source];
            let relative = relative_paths.get(original.path());
            let source_index = match sources.get_index_of(relative) {
                Some(index) => index,
                None => {
                    sources.insert(relative.to_string(), original.contents().to_string());
                    sources.len() - 1
                }
            };

            let mut segment = RawSegment::mapped(
                mapping.generated_segment.column as i64,
                source_index as i64,
                mapping.original_segment.line as i64,
                mapping.original_segment.column as i64,
            );
            if let Some(name) = &mapping.name {
                let (name_index, _) = names.insert_full(name.clone());
                segment = segment.with_name(name_index as i64);
            }

            let line = mapping.generated_segment.line;
            if line >= lines.len() {
                lines.resize_with(line + 1, Vec::new);
            }
            lines[line].push(segment);
        }

        let (sources, sources_content): (Vec<_>, Vec<_>) = sources
            .into_iter()
            .map(|(path, contents)| (path, Some(contents)))
            .unzip();

        RawSourceMap {
            version: 3,
            file: Some(fs.basename(file.path())),
            source_root: None,
            sources,
            names: names.into_iter().map(|name| name.to_string()).collect(),
            mappings: remap_codec::encode(&lines),
            sources_content: Some(sources_content),
        }
    }
}
