//! Decoded `mappings` segments.

use crate::error::DecodeError;
use crate::vlq::{decode_vlq, encode_vlq};

/// One decoded segment with absolute (non-delta) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSegment {
    /// Column in the generated line.
    pub generated_column: i64,
    /// Original position, present for 4- and 5-field segments.
    pub original: Option<OriginalPosition>,
}

/// The source-side fields of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Index into the map's `sources`.
    pub source: i64,
    /// Line in the original source.
    pub line: i64,
    /// Column in the original source.
    pub column: i64,
    /// Index into the map's `names`, for 5-field segments.
    pub name: Option<i64>,
}

impl RawSegment {
    /// A segment that marks a generated column with no original position.
    pub fn generated(generated_column: i64) -> Self {
        Self {
            generated_column,
            original: None,
        }
    }

    /// A 4-field segment.
    pub fn mapped(generated_column: i64, source: i64, line: i64, column: i64) -> Self {
        Self {
            generated_column,
            original: Some(OriginalPosition {
                source,
                line,
                column,
                name: None,
            }),
        }
    }

    /// Attach a name index, turning a 4-field segment into a 5-field one.
    pub fn with_name(mut self, name: i64) -> Self {
        if let Some(original) = &mut self.original {
            original.name = Some(name);
        }
        self
    }
}

/// Running values that every field is a delta against.
#[derive(Default)]
struct DeltaState {
    source: i64,
    line: i64,
    column: i64,
    name: i64,
}

/// Decode a `mappings` string into one segment list per generated line.
///
/// Only the generated column resets at a line break; the other fields
/// accumulate over the whole string. Segments with 2 or 3 fields advance
/// the running state but yield no original position.
pub fn decode(mappings: &str) -> Result<Vec<Vec<RawSegment>>, DecodeError> {
    let bytes = mappings.as_bytes();
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut state = DeltaState::default();
    let mut generated_column = 0i64;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b';' => {
                lines.push(std::mem::take(&mut current));
                generated_column = 0;
                pos += 1;
            }
            b',' => pos += 1,
            _ => {
                let start = pos;
                let mut fields = [0i64; 5];
                let mut count = 0;
                while pos < bytes.len() && bytes[pos] != b',' && bytes[pos] != b';' {
                    let (value, next) = decode_vlq(bytes, pos)?;
                    if count < fields.len() {
                        fields[count] = value;
                    }
                    count += 1;
                    pos = next;
                }

                accumulate(&mut generated_column, fields[0], start)?;
                if count > 1 {
                    accumulate(&mut state.source, fields[1], start)?;
                }
                if count > 2 {
                    accumulate(&mut state.line, fields[2], start)?;
                }
                if count > 3 {
                    accumulate(&mut state.column, fields[3], start)?;
                }
                if count > 4 {
                    accumulate(&mut state.name, fields[4], start)?;
                }

                let original = (count >= 4).then_some(OriginalPosition {
                    source: state.source,
                    line: state.line,
                    column: state.column,
                    name: (count >= 5).then_some(state.name),
                });
                current.push(RawSegment {
                    generated_column,
                    original,
                });
            }
        }
    }
    lines.push(current);

    Ok(lines)
}

fn accumulate(total: &mut i64, delta: i64, offset: usize) -> Result<(), DecodeError> {
    *total = total
        .checked_add(delta)
        .ok_or(DecodeError::Overflow { offset })?;
    Ok(())
}

/// Encode per-line segment lists back into a `mappings` string.
pub fn encode(lines: &[Vec<RawSegment>]) -> String {
    let mut out = String::new();
    let mut state = DeltaState::default();

    for (index, segments) in lines.iter().enumerate() {
        if index > 0 {
            out.push(';');
        }
        let mut generated_column = 0i64;
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            encode_vlq(segment.generated_column - generated_column, &mut out);
            generated_column = segment.generated_column;

            let Some(original) = segment.original else {
                continue;
            };
            encode_vlq(original.source - state.source, &mut out);
            encode_vlq(original.line - state.line, &mut out);
            encode_vlq(original.column - state.column, &mut out);
            state.source = original.source;
            state.line = original.line;
            state.column = original.column;

            if let Some(name) = original.name {
                encode_vlq(name - state.name, &mut out);
                state.name = name;
            }
        }
    }

    out
}
