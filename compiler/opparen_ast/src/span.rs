#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Line and column are 1-based; the column counts Unicode scalar values, not
/// bytes. The offset is the 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    /// Computes the line/column of `offset` within `source`.
    ///
    /// Offsets past the end clamp to the end of the source. Offsets that fall
    /// inside a multi-byte character are attributed to that character.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (idx, ch) in source.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Location {
            line,
            column,
            offset,
        }
    }
}

/// A byte range in source text plus the line/column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Builds a span over `start..end` of `source`, computing the start position.
    pub fn in_source(source: &str, start: usize, end: usize) -> Self {
        let loc = Location::from_offset(source, start);
        Span {
            start,
            end: end.max(start),
            line: loc.line as u32,
            column: loc.column as u32,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
