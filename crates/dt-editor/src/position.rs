//! Text position and range types.
//!
//! All coordinates are **0-indexed**. Line 0 is the first line, column 0 is
//! the first character. Columns count Unicode scalar values (chars), not
//! bytes. The status line converts to 1-indexed for the user; that
//! conversion never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` may sit one past the last character of its line: that is where
/// insert mode appends and where `$` lands.
///
/// # Ordering
///
/// Positions are ordered lexicographically: line first, then column.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin: line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the status line: `line,col`, 1-indexed.
        write!(f, "{},{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// Whether a range covers whole lines or a precise column span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// `start.col .. end.col` within the lines, possibly crossing lines.
    Char,
    /// Every line from `start.line` through `end.line`; columns are ignored.
    Line,
}

/// The result of resolving a motion: what an operator acts on.
///
/// A motion produces a range from the cursor to its target, so `end` may
/// precede `start` for backward motions. Operators call
/// [`normalized`](Self::normalized) before touching text.
///
/// For char-wise ranges, `inclusive` says whether the character at `end`
/// is part of the span (`$`, visual selections) or not (`w`, `l`, `0`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
    pub kind: RangeKind,
    pub inclusive: bool,
}

impl Range {
    /// An exclusive char-wise range.
    #[inline]
    #[must_use]
    pub const fn chars(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            kind: RangeKind::Char,
            inclusive: false,
        }
    }

    /// An inclusive char-wise range: `end` itself is covered.
    #[inline]
    #[must_use]
    pub const fn chars_inclusive(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            kind: RangeKind::Char,
            inclusive: true,
        }
    }

    /// A line-wise range.
    #[inline]
    #[must_use]
    pub const fn lines(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            kind: RangeKind::Line,
            inclusive: true,
        }
    }

    /// Swap `start` and `end` if the range runs backward.
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Self {
                start: self.end,
                end: self.start,
                ..self
            }
        } else {
            self
        }
    }

    /// The same endpoints, reinterpreted as whole lines.
    #[inline]
    #[must_use]
    pub const fn linewise(self) -> Self {
        Self {
            kind: RangeKind::Line,
            inclusive: true,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn is_linewise(self) -> bool {
        self.kind == RangeKind::Line
    }

    /// Number of lines the range touches. Assumes a normalized range.
    #[inline]
    #[must_use]
    pub const fn line_span(self) -> usize {
        self.end.line - self.start.line + 1
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let close = if self.inclusive { ']' } else { ')' };
        write!(
            f,
            "{:?}[{:?}..{:?}{close}",
            self.kind, self.start, self.end
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering_is_line_first() {
        assert!(Position::new(0, 50) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
    }

    #[test]
    fn position_display_is_one_based() {
        assert_eq!(Position::new(0, 0).to_string(), "1,1");
        assert_eq!(Position::new(9, 4).to_string(), "10,5");
    }

    #[test]
    fn normalized_swaps_backward_range() {
        let r = Range::chars(Position::new(3, 2), Position::new(1, 5)).normalized();
        assert_eq!(r.start, Position::new(1, 5));
        assert_eq!(r.end, Position::new(3, 2));
        assert_eq!(r.kind, RangeKind::Char);
    }

    #[test]
    fn normalized_keeps_forward_range_and_flags() {
        let r = Range::chars_inclusive(Position::new(0, 1), Position::new(0, 4));
        assert_eq!(r.normalized(), r);
        assert!(r.normalized().inclusive);
    }

    #[test]
    fn linewise_coercion() {
        let r = Range::chars(Position::new(1, 3), Position::new(4, 0)).linewise();
        assert!(r.is_linewise());
        assert_eq!(r.line_span(), 4);
    }

    #[test]
    fn debug_shows_kind_and_bounds() {
        let r = Range::chars(Position::new(0, 2), Position::new(0, 5));
        assert_eq!(format!("{r:?}"), "Char[Pos(0:2)..Pos(0:5))");
    }
}
