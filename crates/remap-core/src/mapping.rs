//! Mappings between a generated file and its sources, and how two of them
//! compose.

use la_arena::Arena;
use remap_codec::RawSegment;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::cmp::Ordering;

use crate::error::MappingError;
use crate::raw_map::RawSourceMap;
use crate::segment::{compare_segments, offset_segment, SegmentMarker};
use crate::source_file::{SourceFile, SourceFileId};

/// One correspondence between a generated position and an original one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Position in the generated file.
    pub generated_segment: SegmentMarker,
    /// Position in `original_source`.
    pub original_segment: SegmentMarker,
    /// The file `original_segment` points into.
    pub original_source: SourceFileId,
    /// Symbol name carried by a 5-field segment.
    pub name: Option<SmolStr>,
}

/// Decode the mappings of `raw_map` against already-loaded `sources`.
///
/// Segments are dropped when they have no original position, when their
/// source is missing or out of range, or when a line does not exist in the
/// file it refers to.
pub fn parse_mappings(
    raw_map: Option<&RawSourceMap>,
    sources: &[Option<SourceFileId>],
    files: &Arena<SourceFile>,
    generated_line_starts: &[usize],
) -> Result<Vec<Mapping>, MappingError> {
    let Some(raw_map) = raw_map else {
        return Ok(Vec::new());
    };
    let raw_lines = remap_codec::decode(&raw_map.mappings)?;

    let mut mappings = Vec::new();
    for (generated_line, segments) in raw_lines.iter().enumerate() {
        for segment in segments {
            if let Some(mapping) =
                parse_segment(segment, generated_line, raw_map, sources, files, generated_line_starts)
            {
                mappings.push(mapping);
            }
        }
    }

    Ok(mappings)
}

fn parse_segment(
    segment: &RawSegment,
    generated_line: usize,
    raw_map: &RawSourceMap,
    sources: &[Option<SourceFileId>],
    files: &Arena<SourceFile>,
    generated_line_starts: &[usize],
) -> Option<Mapping> {
    let original = segment.original?;
    let source_index = usize::try_from(original.source).ok()?;
    let original_source = (*sources.get(source_index)?)?;

    let generated_column = usize::try_from(segment.generated_column).ok()?;
    let line = usize::try_from(original.line).ok()?;
    let column = usize::try_from(original.column).ok()?;

    let generated_segment =
        SegmentMarker::at(generated_line_starts, generated_line, generated_column)?;
    let original_segment = SegmentMarker::at(files[original_source].line_starts(), line, column)?;

    let name = original
        .name
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| raw_map.names.get(index))
        .map(SmolStr::from);

    Some(Mapping {
        generated_segment,
        original_segment,
        original_source,
        name,
    })
}

/// Find the last mapping whose generated segment is at or before `marker`
/// (strictly before, if `exclusive`).
///
/// `mappings` must be sorted by generated segment. The search starts at
/// `lower_index`, which the caller guarantees is not past the answer;
/// `None` is returned when the mapping at `lower_index` already lies beyond
/// `marker`. Among mappings sharing a generated segment the highest index
/// wins.
pub fn find_last_mapping_index_before(
    mappings: &[Mapping],
    marker: &SegmentMarker,
    exclusive: bool,
    lower_index: usize,
) -> Option<usize> {
    let qualifies = |mapping: &Mapping| match compare_segments(&mapping.generated_segment, marker) {
        Ordering::Less => true,
        Ordering::Equal => !exclusive,
        Ordering::Greater => false,
    };

    if !qualifies(mappings.get(lower_index)?) {
        return None;
    }
    let count = mappings[lower_index..].partition_point(qualifies);
    Some(lower_index + count - 1)
}

/// Compose `ab` (A to B) with `bc` (B to C) into a mapping from A to C.
///
/// `generated_line_starts` describes A and `original_line_starts` C. The
/// side that is shifted depends on which of the two cut points in B comes
/// first; the shift is the distance between them in B.
pub fn merge_mappings(
    generated_line_starts: &[usize],
    ab: &Mapping,
    bc: &Mapping,
    original_line_starts: &[usize],
) -> Mapping {
    let name = bc.name.clone().or_else(|| ab.name.clone());
    let diff = bc.generated_segment.position as isize - ab.original_segment.position as isize;

    if compare_segments(&bc.generated_segment, &ab.original_segment) == Ordering::Greater {
        Mapping {
            generated_segment: offset_segment(generated_line_starts, ab.generated_segment, diff),
            original_segment: bc.original_segment,
            original_source: bc.original_source,
            name,
        }
    } else {
        Mapping {
            generated_segment: ab.generated_segment,
            original_segment: offset_segment(original_line_starts, bc.original_segment, -diff),
            original_source: bc.original_source,
            name,
        }
    }
}

/// For each mapping, the next original segment in the same source file.
///
/// Original segments are ordered per source file; the last one in each file
/// has no successor.
pub fn original_segment_successors(mappings: &[Mapping]) -> Vec<Option<SegmentMarker>> {
    let mut by_source: FxHashMap<SourceFileId, Vec<usize>> = FxHashMap::default();
    for (index, mapping) in mappings.iter().enumerate() {
        by_source.entry(mapping.original_source).or_default().push(index);
    }

    let mut successors = vec![None; mappings.len()];
    for indices in by_source.values_mut() {
        indices.sort_by(|&a, &b| {
            compare_segments(&mappings[a].original_segment, &mappings[b].original_segment)
        });
        for pair in indices.windows(2) {
            successors[pair[0]] = Some(mappings[pair[1]].original_segment);
        }
    }

    successors
}
