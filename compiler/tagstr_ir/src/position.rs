//! Source positions.

use std::fmt;

/// A row/column location in source text.
///
/// Rows are 1-based, columns are 0-based and counted in characters, matching
/// the host tokenizer. Ordering is lexicographic: row first, then column.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Position { row, col }
    }

    /// The same row, `by` columns further right.
    #[inline]
    #[must_use]
    pub const fn right(self, by: u32) -> Self {
        Position {
            row: self.row,
            col: self.col + by,
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl From<(u32, u32)> for Position {
    fn from((row, col): (u32, u32)) -> Self {
        Position { row, col }
    }
}
