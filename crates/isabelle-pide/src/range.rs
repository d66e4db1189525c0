//! Value types describing highlighted regions of a document.

use serde::{Deserialize, Serialize};

/// A highlighted span in a document, in zero-based line and column units.
///
/// Ranges compare structurally so they can live in ordered or hashed sets and
/// be diffed by value between successive decoration pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Range {
    /// First line of the range.
    pub start_line: u32,
    /// Column on the first line where the range begins.
    pub start_col: u32,
    /// Last line of the range.
    pub end_line: u32,
    /// Column on the last line where the range ends.
    pub end_col: u32,
}

impl Range {
    /// Builds a range from its four coordinates.
    #[must_use]
    pub const fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Builds a range from the `[startLine, startCol, endLine, endCol]` wire form.
    ///
    /// Returns `None` unless the slice holds exactly four non-negative values
    /// that fit in a `u32`.
    #[must_use]
    pub fn from_wire(coordinates: &[i64]) -> Option<Self> {
        let [start_line, start_col, end_line, end_col] = coordinates else {
            return None;
        };
        Some(Self::new(
            u32::try_from(*start_line).ok()?,
            u32::try_from(*start_col).ok()?,
            u32::try_from(*end_line).ok()?,
            u32::try_from(*end_col).ok()?,
        ))
    }

    /// Lines covered by the range, with the end bound made exclusive.
    #[must_use]
    pub const fn line_span(&self) -> LineSpan {
        LineSpan::new(self.start_line, self.end_line.saturating_add(1))
    }
}

/// A half-open run of whole lines, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineSpan {
    /// First line in the span.
    pub start: u32,
    /// One past the last line in the span.
    pub end: u32,
}

impl LineSpan {
    /// Builds a span covering `start..end`.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether the two spans share at least one line.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
