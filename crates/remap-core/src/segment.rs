//! Positions inside a text file.

use std::cmp::Ordering;

/// A position in a file, held both as line/column and as an absolute offset.
///
/// Columns and offsets count UTF-16 code units, the unit source maps use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentMarker {
    /// Zero-based line.
    pub line: usize,
    /// Zero-based column within the line.
    pub column: usize,
    /// Offset from the start of the file.
    pub position: usize,
}

impl SegmentMarker {
    /// Create a marker, deriving the position from the file's line starts.
    ///
    /// Returns `None` if `line` is past the last line of the file.
    pub fn at(line_starts: &[usize], line: usize, column: usize) -> Option<Self> {
        let start = line_starts.get(line)?;
        Some(Self {
            line,
            column,
            position: start + column,
        })
    }
}

/// Order two markers by line, then column.
///
/// The absolute position is not consulted.
pub fn compare_segments(a: &SegmentMarker, b: &SegmentMarker) -> Ordering {
    a.line.cmp(&b.line).then(a.column.cmp(&b.column))
}

/// Move `marker` by `offset` characters within the file described by
/// `line_starts`, recomputing its line and column.
///
/// Positions before the start of the file clamp to zero.
pub fn offset_segment(line_starts: &[usize], marker: SegmentMarker, offset: isize) -> SegmentMarker {
    if offset == 0 {
        return marker;
    }

    let position = marker.position.saturating_add_signed(offset);
    let mut line = marker.line.min(line_starts.len().saturating_sub(1));
    while line + 1 < line_starts.len() && line_starts[line + 1] <= position {
        line += 1;
    }
    while line > 0 && line_starts[line] > position {
        line -= 1;
    }
    let column = position - line_starts.get(line).copied().unwrap_or(0);

    SegmentMarker {
        line,
        column,
        position,
    }
}

/// Offsets at which each line of `text` starts.
///
/// Lines are split on `\n` and one unit is counted for the line break.
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut position = 0;
    for line in text.split('\n') {
        starts.push(position);
        position += utf16_len(line) + 1;
    }
    starts
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}
