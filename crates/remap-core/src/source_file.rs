//! Source files and their flattened mappings.

use la_arena::{Arena, Idx};
use std::path::{Path, PathBuf};

use crate::comment::remove_source_map_comments;
use crate::error::MappingError;
use crate::mapping::{
    find_last_mapping_index_before, merge_mappings, original_segment_successors, parse_mappings,
    Mapping,
};
use crate::raw_map::MapAndPath;
use crate::segment::{compute_line_starts, offset_segment, utf16_len, SegmentMarker};

pub type SourceFileId = Idx<SourceFile>;

/// A file, the source map it carries, and its mappings flattened down to
/// files that have no source map of their own.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    contents: String,
    len: usize,
    raw_map: Option<MapAndPath>,
    sources: Vec<Option<SourceFileId>>,
    line_starts: Vec<usize>,
    flattened_mappings: Vec<Mapping>,
}

impl SourceFile {
    /// A file with no source map.
    pub(crate) fn pure(path: impl Into<PathBuf>, contents: &str) -> Self {
        let contents = remove_source_map_comments(contents);
        Self {
            path: path.into(),
            len: utf16_len(&contents),
            line_starts: compute_line_starts(&contents),
            contents,
            raw_map: None,
            sources: Vec::new(),
            flattened_mappings: Vec::new(),
        }
    }

    /// Path of this file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text of this file, without source map comments.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// The source map this file was loaded with.
    pub fn raw_map(&self) -> Option<&MapAndPath> {
        self.raw_map.as_ref()
    }

    /// Files named by the raw map's `sources`; `None` where one could not
    /// be loaded.
    pub fn sources(&self) -> &[Option<SourceFileId>] {
        &self.sources
    }

    /// Offset of the first character of every line.
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// Mappings straight to original files, sorted by generated segment.
    pub fn flattened_mappings(&self) -> &[Mapping] {
        &self.flattened_mappings
    }

    /// Whether nothing in this file maps anywhere else.
    pub fn is_pure(&self) -> bool {
        self.flattened_mappings.is_empty()
    }
}

/// Where a generated position came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalLocation {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// Owns every loaded [`SourceFile`].
///
/// Files refer to each other by [`SourceFileId`]. A file can only be added
/// once its sources are in the store, so the graph is acyclic by
/// construction.
#[derive(Debug, Default)]
pub struct SourceFileStore {
    files: Arena<SourceFile>,
}

impl SourceFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with no source map.
    pub fn add_pure(&mut self, path: impl Into<PathBuf>, contents: &str) -> SourceFileId {
        self.files.alloc(SourceFile::pure(path, contents))
    }

    /// Add a file generated from `sources` through `raw_map`, flattening
    /// its mappings against the sources' own flattened mappings.
    ///
    /// Every id in `sources` must belong to this store.
    pub fn add(
        &mut self,
        path: impl Into<PathBuf>,
        contents: &str,
        raw_map: Option<MapAndPath>,
        sources: Vec<Option<SourceFileId>>,
    ) -> Result<SourceFileId, MappingError> {
        let mut file = SourceFile::pure(path, contents);
        let mappings = parse_mappings(
            raw_map.as_ref().map(|map_and_path| &map_and_path.map),
            &sources,
            &self.files,
            &file.line_starts,
        )?;
        file.flattened_mappings = flatten_mappings(&self.files, &file.line_starts, mappings);
        file.raw_map = raw_map;
        file.sources = sources;

        tracing::trace!(
            path = %file.path.display(),
            mappings = file.flattened_mappings.len(),
            "flattened source file"
        );

        Ok(self.files.alloc(file))
    }

    pub fn get(&self, id: SourceFileId) -> &SourceFile {
        &self.files[id]
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceFileId, &SourceFile)> {
        self.files.iter()
    }

    /// Find the original location of `line`/`column` in the generated file
    /// `id`.
    ///
    /// The closest mapping at or before the position is taken and the
    /// distance from its generated segment is applied to its original
    /// segment. A line or column past the end of the file is treated as the
    /// end of the file. Returns `None` if the file has no mappings.
    pub fn original_location(
        &self,
        id: SourceFileId,
        line: usize,
        column: usize,
    ) -> Option<OriginalLocation> {
        let file = &self.files[id];
        if file.flattened_mappings.is_empty() {
            return None;
        }

        let position = match file.line_starts.get(line) {
            Some(start) => start.saturating_add(column).min(file.len),
            None => file.len,
        };
        let location = SegmentMarker {
            line,
            column,
            position,
        };

        let index =
            find_last_mapping_index_before(&file.flattened_mappings, &location, false, 0).unwrap_or(0);
        let mapping = &file.flattened_mappings[index];
        let original = &self.files[mapping.original_source];
        let offset = position as isize - mapping.generated_segment.position as isize;
        let marker = offset_segment(&original.line_starts, mapping.original_segment, offset);

        Some(OriginalLocation {
            file: original.path.clone(),
            line: marker.line,
            column: marker.column,
        })
    }
}

impl std::ops::Index<SourceFileId> for SourceFileStore {
    type Output = SourceFile;

    fn index(&self, id: SourceFileId) -> &Self::Output {
        &self.files[id]
    }
}

/// Replace every mapping that points into a generated file with the
/// mappings of that file it covers.
///
/// Consider A mapping into B, where B itself maps into C. A mapping from A
/// covers the part of B between its original segment and the next original
/// segment any A mapping uses in B:
///
/// ```text
///   src A   src B     mapping
///
///     a ----- a       [0, 0]
///     b       b
///     f -  /- c       [4, 2]
///     g  \ /  d
///     c -/\   e
///     d    \- f       [2, 5]
///     e
/// ```
///
/// `[0, 0]` covers `a b`, `[4, 2]` covers `c d e` and `[2, 5]` the rest of B.
/// Each B mapping that starts in (or last started before) the covered part
/// is merged with the A mapping. B's mappings are already flat, so one
/// level of composition reaches the original files.
fn flatten_mappings(
    files: &Arena<SourceFile>,
    generated_line_starts: &[usize],
    mappings: Vec<Mapping>,
) -> Vec<Mapping> {
    let successors = original_segment_successors(&mappings);
    let mut flattened = Vec::with_capacity(mappings.len());

    for (ab, incoming_end) in mappings.into_iter().zip(successors) {
        let b_mappings = files[ab.original_source].flattened_mappings();
        if b_mappings.is_empty() {
            flattened.push(ab);
            continue;
        }

        let incoming_start = &ab.original_segment;
        let outgoing_start =
            find_last_mapping_index_before(b_mappings, incoming_start, false, 0).unwrap_or(0);
        let outgoing_end = match incoming_end {
            Some(end) => find_last_mapping_index_before(b_mappings, &end, true, outgoing_start),
            None => Some(b_mappings.len() - 1),
        };
        let Some(outgoing_end) = outgoing_end else {
            continue;
        };

        for bc in &b_mappings[outgoing_start..=outgoing_end] {
            let c_line_starts = files[bc.original_source].line_starts();
            flattened.push(merge_mappings(generated_line_starts, &ab, bc, c_line_starts));
        }
    }

    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_map::RawSourceMap;

    fn map(sources: &[&str], mappings: &str) -> MapAndPath {
        MapAndPath::new(
            RawSourceMap {
                version: 3,
                file: None,
                source_root: None,
                sources: sources.iter().map(|s| s.to_string()).collect(),
                names: vec![],
                mappings: mappings.to_string(),
                sources_content: None,
            },
            None,
        )
    }

    fn marker(line: usize, column: usize, position: usize) -> SegmentMarker {
        SegmentMarker {
            line,
            column,
            position,
        }
    }

    fn location(file: &str, line: usize, column: usize) -> OriginalLocation {
        OriginalLocation {
            file: PathBuf::from(file),
            line,
            column,
        }
    }

    #[test]
    fn test_file_without_map_has_no_mappings() {
        let mut store = SourceFileStore::new();
        let id = store.add("/a.js", "const a = 1;\n", None, vec![]).unwrap();
        assert!(store[id].flattened_mappings().is_empty());
        assert!(store[id].is_pure());
        assert_eq!(store.original_location(id, 0, 0), None);
    }

    #[test]
    fn test_contents_are_stripped_of_map_comments() {
        let mut store = SourceFileStore::new();
        let id = store.add_pure("/a.js", "let a;\n//# sourceMappingURL=a.js.map\n");
        assert_eq!(store[id].contents(), "let a;\n");
        assert_eq!(store[id].line_starts(), &[0, 7]);
    }

    #[test]
    fn test_single_level_passthrough() {
        let mut store = SourceFileStore::new();
        let b = store.add_pure("/b.ts", "abc\ndef");
        let c = store.add_pure("/c.ts", "xyz");
        let a = store
            .add("/a.js", "0123456789", Some(map(&["b.ts", "c.ts"], "AAAA,EACA,EDAE")), vec![Some(b), Some(c)])
            .unwrap();

        let flattened = store[a].flattened_mappings();
        assert_eq!(flattened.len(), 3);
        assert_eq!(flattened[0].original_source, b);
        assert_eq!(flattened[0].original_segment, marker(0, 0, 0));
        assert_eq!(flattened[1].original_source, c);
        assert_eq!(flattened[1].generated_segment, marker(0, 2, 2));
        assert_eq!(flattened[1].original_segment, marker(0, 0, 0));
        assert_eq!(flattened[2].original_source, b);
        assert_eq!(flattened[2].generated_segment, marker(0, 4, 4));
        assert_eq!(flattened[2].original_segment, marker(0, 2, 2));
    }

    #[test]
    fn test_mid_segment_offset() {
        // C: two lines. B maps col 0 to C 0:0 and col 5 to C 1:0.
        // A maps col 0 to B col 2, i.e. inside B's first segment.
        let mut store = SourceFileStore::new();
        let c = store.add_pure("/c.ts", "abcdefgh\nijklmnop");
        let b = store
            .add("/b.js", "abcdefghij", Some(map(&["c.ts"], "AAAA,KACA")), vec![Some(c)])
            .unwrap();
        let a = store
            .add("/a.js", "cdefghij", Some(map(&["b.js"], "AAAE")), vec![Some(b)])
            .unwrap();

        let flattened = store[a].flattened_mappings();
        assert_eq!(flattened.len(), 2);
        assert!(flattened.iter().all(|m| m.original_source == c));

        assert_eq!(flattened[0].generated_segment, marker(0, 0, 0));
        assert_eq!(flattened[0].original_segment, marker(0, 2, 2));

        // B's second segment starts 3 characters after A's cut point in B.
        assert_eq!(flattened[1].generated_segment, marker(0, 3, 3));
        assert_eq!(flattened[1].original_segment, marker(1, 0, 9));
    }

    #[test]
    fn test_transitive_lookup_matches_manual_composition() {
        let c_text = "function add(a, b) {\n  return a + b;\n}\n";
        let b_text = "function add(a,b){\nreturn a+b}\n";
        let a_text = "function add(a,b){return a+b}";
        let b_map = "AAAA,SAAS,IAAI,EAAG;AACd,OAAO,EAAI,CACb";
        let a_map = "AAAA,SAAS,SACT";

        let mut store = SourceFileStore::new();
        let c = store.add_pure("/src/c.ts", c_text);
        let b = store
            .add("/build/b.js", b_text, Some(map(&["../src/c.ts"], b_map)), vec![Some(c)])
            .unwrap();
        let a = store
            .add("/dist/a.js", a_text, Some(map(&["../build/b.js"], a_map)), vec![Some(b)])
            .unwrap();
        assert!(store[a].flattened_mappings().iter().all(|m| m.original_source == c));

        // The same A, but with B treated as an original file.
        let mut unflattened = SourceFileStore::new();
        let pure_b = unflattened.add_pure("/build/b.js", b_text);
        let a_to_b = unflattened
            .add("/dist/a.js", a_text, Some(map(&["../build/b.js"], a_map)), vec![Some(pure_b)])
            .unwrap();

        for column in [0, 9, 12, 18, 25, 27] {
            let in_b = unflattened.original_location(a_to_b, 0, column).unwrap();
            assert_eq!(in_b.file, PathBuf::from("/build/b.js"));
            let manual = store.original_location(b, in_b.line, in_b.column).unwrap();
            let direct = store.original_location(a, 0, column).unwrap();
            assert_eq!(direct, manual, "generated column {column}");
        }

        assert_eq!(store.original_location(a, 0, 25), Some(location("/src/c.ts", 1, 9)));
        assert_eq!(store.original_location(a, 0, 28), Some(location("/src/c.ts", 2, 0)));
    }

    #[test]
    fn test_original_location() {
        let mut store = SourceFileStore::new();
        let c = store.add_pure("/c.ts", "abc\ndefgh\n");
        let a = store
            .add("/a.js", "0123\n456789", Some(map(&["c.ts"], "AAAA;AACA,EAAC")), vec![Some(c)])
            .unwrap();

        assert_eq!(store.original_location(a, 0, 2), Some(location("/c.ts", 0, 2)));
        assert_eq!(store.original_location(a, 1, 1), Some(location("/c.ts", 1, 1)));
        assert_eq!(store.original_location(a, 1, 3), Some(location("/c.ts", 1, 2)));
        // Past the last line: clamps to the end of the generated file.
        assert_eq!(store.original_location(a, 7, 0), Some(location("/c.ts", 1, 5)));
    }

    #[test]
    fn test_original_location_huge_column() {
        let mut store = SourceFileStore::new();
        let c = store.add_pure("/c.ts", "abc\ndefgh\n");
        let a = store
            .add("/a.js", "0123\n456789", Some(map(&["c.ts"], "AAAA;AACA,EAAC")), vec![Some(c)])
            .unwrap();

        assert_eq!(
            store.original_location(a, 1, usize::MAX),
            Some(location("/c.ts", 1, 5))
        );
    }

    #[test]
    fn test_overflowing_mappings_are_an_error() {
        let mut segment = String::new();
        remap_codec::vlq::encode_vlq((1 << 62) - 1, &mut segment);
        let mappings = [segment.as_str(); 3].join(",");

        let mut store = SourceFileStore::new();
        let c = store.add_pure("/c.ts", "abc");
        let err = store
            .add("/a.js", "abc", Some(map(&["c.ts"], &mappings)), vec![Some(c)])
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::Decode(remap_codec::DecodeError::Overflow { offset: 28 })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_source_is_a_gap() {
        let mut store = SourceFileStore::new();
        let c = store.add_pure("/c.ts", "abc");
        let a = store
            .add("/a.js", "0123", Some(map(&["missing.ts", "c.ts"], "AAAA,CCAA")), vec![None, Some(c)])
            .unwrap();
        let flattened = store[a].flattened_mappings();
        assert_eq!(flattened.len(), 1);
        assert_eq!(flattened[0].generated_segment.column, 1);
    }
}
