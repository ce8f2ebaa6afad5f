//! Motions: cursor-movement rules that resolve to a [`Range`].
//!
//! A motion takes the cursor position and an optional repeat count and
//! produces a range from the cursor to its target. In NORMAL mode the cursor
//! simply jumps to the range end; after an operator, the operator consumes
//! the whole range.
//!
//! | Keys | Motion               | Range kind          |
//! |------|----------------------|---------------------|
//! | `h`  | left                 | char, exclusive     |
//! | `l`  | right                | char, exclusive     |
//! | `j`  | down                 | line                |
//! | `k`  | up                   | line                |
//! | `0`  | column 0             | char, exclusive     |
//! | `$`  | end of line          | char, inclusive     |
//! | `gg` | first line (or N)    | line                |
//! | `G`  | last line (or N)     | line                |
//! | `w`  | next word start      | char, exclusive     |
//! | `}`  | next blank line      | char, exclusive     |
//!
//! After an operator, repeating the operator key (`dd`, `cc`, `yy`, `>>`,
//! `<<`, `g~~`, `guu`, `gUU`) is the current-line motion.

use crate::buffer::EditorBuffer;
use crate::position::{Position, Range};
use crate::trie::KeyTrie;

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Down,
    Up,
    LineStart,
    LineEnd,
    FirstLine,
    LastLine,
    WordForward,
    ParagraphForward,
    /// `count` whole lines starting at the cursor. Operator-pending only.
    CurrentLine,
}

const MOTION_KEYS: &[(&str, Motion)] = &[
    ("h", Motion::Left),
    ("l", Motion::Right),
    ("j", Motion::Down),
    ("k", Motion::Up),
    ("0", Motion::LineStart),
    ("$", Motion::LineEnd),
    ("gg", Motion::FirstLine),
    ("G", Motion::LastLine),
    ("w", Motion::WordForward),
    ("}", Motion::ParagraphForward),
];

/// Operator keys that, typed again, mean "this line".
const LINE_SELF_KEYS: &[&str] = &["d", "c", "y", ">", "<", "~", "u", "U"];

/// Motions available in NORMAL and VISUAL mode.
#[must_use]
pub fn motion_trie() -> KeyTrie<Motion> {
    KeyTrie::from_entries(MOTION_KEYS.iter().copied())
}

/// Motions available after an operator: the normal set plus current-line.
#[must_use]
pub fn pending_motion_trie() -> KeyTrie<Motion> {
    let mut trie = motion_trie();
    for keys in LINE_SELF_KEYS {
        trie.insert(keys, Motion::CurrentLine);
    }
    trie
}

impl Motion {
    /// Resolve the motion from `from`, repeated `count` times (default 1).
    #[must_use]
    pub fn resolve(self, buf: &EditorBuffer, from: Position, count: Option<usize>) -> Range {
        let n = count.unwrap_or(1).max(1);
        let last_line = buf.line_count() - 1;

        match self {
            Self::Left => Range::chars(from, Position::new(from.line, from.col.saturating_sub(n))),
            Self::Right => {
                let col = from.col.saturating_add(n).min(buf.line_len(from.line));
                Range::chars(from, Position::new(from.line, col))
            }
            Self::Down => {
                let line = from.line.saturating_add(n).min(last_line);
                Range::lines(from, Position::new(line, from.col))
            }
            Self::Up => Range::lines(from, Position::new(from.line.saturating_sub(n), from.col)),
            Self::LineStart => Range::chars(from, Position::new(from.line, 0)),
            Self::LineEnd => {
                let line = from.line.saturating_add(n - 1).min(last_line);
                Range::chars_inclusive(from, Position::new(line, buf.line_len(line)))
            }
            Self::FirstLine => {
                let line = count.map_or(0, |c| c.saturating_sub(1).min(last_line));
                Range::lines(from, Position::new(line, 0))
            }
            Self::LastLine => {
                let line = count.map_or(last_line, |c| c.saturating_sub(1).min(last_line));
                Range::lines(from, Position::new(line, 0))
            }
            Self::WordForward => {
                let target = (0..n).fold(from, |pos, _| word_forward(buf, pos));
                Range::chars(from, target)
            }
            Self::ParagraphForward => {
                let target = (0..n).fold(from, |pos, _| paragraph_forward(buf, pos));
                Range::chars(from, target)
            }
            Self::CurrentLine => {
                let line = from.line.saturating_add(n - 1).min(last_line);
                Range::lines(from, Position::new(line, 0))
            }
        }
    }

    /// Resolve for an operator.
    ///
    /// Same as [`resolve`](Self::resolve), except that a word motion which
    /// would run onto a later line stops at the end of the line it started
    /// on: `dw` on the last word of a line does not eat the line break.
    #[must_use]
    pub fn resolve_for_operator(
        self,
        buf: &EditorBuffer,
        from: Position,
        count: Option<usize>,
    ) -> Range {
        let range = self.resolve(buf, from, count);
        if self == Self::WordForward && range.end.line > from.line {
            let eol = Position::new(from.line, buf.line_len(from.line));
            if eol > from {
                return Range::chars(from, eol);
            }
        }
        range
    }
}

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters.
    Punctuation,
    /// Whitespace within a line.
    Blank,
}

fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

// ---------------------------------------------------------------------------
// Word and paragraph targets
// ---------------------------------------------------------------------------

/// `w`: the start of the next word.
///
/// 1. Skip the rest of the current word (same-class chars).
/// 2. Skip blanks, wrapping onto following lines.
/// 3. Stop on the first non-blank, or on an empty line.
///
/// At the end of the buffer the target is the end of the last line.
#[must_use]
pub fn word_forward(buf: &EditorBuffer, pos: Position) -> Position {
    let mut line = pos.line;
    let mut chars: Vec<char> = buf.line(line).chars().collect();
    let mut col = pos.col.min(chars.len());

    if let Some(&ch) = chars.get(col) {
        let class = classify(ch);
        if class != CharClass::Blank {
            while chars.get(col).is_some_and(|&c| classify(c) == class) {
                col += 1;
            }
        }
    }

    loop {
        while chars.get(col).is_some_and(|&c| classify(c) == CharClass::Blank) {
            col += 1;
        }
        if col < chars.len() {
            return Position::new(line, col);
        }
        if line + 1 >= buf.line_count() {
            return Position::new(line, chars.len());
        }
        line += 1;
        col = 0;
        chars = buf.line(line).chars().collect();
        if chars.is_empty() {
            return Position::new(line, 0);
        }
    }
}

/// `}`: the next blank line after the current paragraph.
///
/// A run of blank lines under the cursor is skipped first. With no blank
/// line ahead, the target is the end of the last line.
#[must_use]
pub fn paragraph_forward(buf: &EditorBuffer, pos: Position) -> Position {
    let is_blank = |idx: usize| buf.line(idx).trim().is_empty();
    let count = buf.line_count();

    let mut line = pos.line;
    while line < count && is_blank(line) {
        line += 1;
    }
    while line < count && !is_blank(line) {
        line += 1;
    }

    if line < count {
        Position::new(line, 0)
    } else {
        let last = count - 1;
        Position::new(last, buf.line_len(last))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::RangeKind;

    fn buf(text: &str) -> EditorBuffer {
        EditorBuffer::new("t", text)
    }

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    #[test]
    fn tries_know_every_key() {
        let t = motion_trie();
        for &(keys, motion) in MOTION_KEYS {
            assert_eq!(t.get(keys), Some(motion));
        }
        assert_eq!(t.get("d"), None);
        assert_eq!(pending_motion_trie().get("d"), Some(Motion::CurrentLine));
        assert_eq!(pending_motion_trie().get("U"), Some(Motion::CurrentLine));
    }

    #[test]
    fn down_with_count_clamps() {
        let b = buf("a\nb\nc");
        assert_eq!(Motion::Down.resolve(&b, p(0, 0), Some(2)).end, p(2, 0));
        assert_eq!(Motion::Down.resolve(&b, p(0, 0), Some(9)).end, p(2, 0));
        assert_eq!(Motion::Down.resolve(&b, p(0, 0), None).kind, RangeKind::Line);
    }

    #[test]
    fn left_right_stay_on_line() {
        let b = buf("abc");
        assert_eq!(Motion::Left.resolve(&b, p(0, 1), Some(5)).end, p(0, 0));
        assert_eq!(Motion::Right.resolve(&b, p(0, 1), Some(5)).end, p(0, 3));
    }

    #[test]
    fn line_end_is_inclusive() {
        let b = buf("hello");
        let r = Motion::LineEnd.resolve(&b, p(0, 1), None);
        assert!(r.inclusive);
        assert_eq!(r.end, p(0, 5));
    }

    #[test]
    fn last_line_with_count_is_line_number() {
        let b = buf("1\n2\n3\n4");
        assert_eq!(Motion::LastLine.resolve(&b, p(0, 0), None).end, p(3, 0));
        assert_eq!(Motion::LastLine.resolve(&b, p(0, 0), Some(2)).end, p(1, 0));
        assert_eq!(Motion::LastLine.resolve(&b, p(0, 0), Some(99)).end, p(3, 0));
        assert_eq!(Motion::FirstLine.resolve(&b, p(3, 0), None).end, p(0, 0));
    }

    #[test]
    fn word_forward_skips_word_then_blanks() {
        let b = buf("hello world");
        assert_eq!(word_forward(&b, p(0, 0)), p(0, 6));
        assert_eq!(word_forward(&b, p(0, 5)), p(0, 6));
    }

    #[test]
    fn word_forward_stops_at_punctuation() {
        let b = buf("foo.bar");
        assert_eq!(word_forward(&b, p(0, 0)), p(0, 3));
        assert_eq!(word_forward(&b, p(0, 3)), p(0, 4));
    }

    #[test]
    fn word_forward_wraps_and_skips_indent() {
        let b = buf("end\n   next");
        assert_eq!(word_forward(&b, p(0, 0)), p(1, 3));
    }

    #[test]
    fn word_forward_stops_on_empty_line() {
        let b = buf("a\n\nb");
        assert_eq!(word_forward(&b, p(0, 0)), p(1, 0));
    }

    #[test]
    fn word_forward_at_buffer_end() {
        let b = buf("last");
        assert_eq!(word_forward(&b, p(0, 1)), p(0, 4));
    }

    #[test]
    fn operator_word_stops_at_line_end() {
        let b = buf("one two\nthree");
        let r = Motion::WordForward.resolve_for_operator(&b, p(0, 4), None);
        assert_eq!(r.end, p(0, 7));
        let plain = Motion::WordForward.resolve(&b, p(0, 4), None);
        assert_eq!(plain.end, p(1, 0));
    }

    #[test]
    fn paragraph_forward_lands_on_blank_line() {
        let b = buf("a\nb\n\nc\nd");
        assert_eq!(paragraph_forward(&b, p(0, 0)), p(2, 0));
    }

    #[test]
    fn paragraph_forward_skips_blank_run_then_goes_to_end() {
        let b = buf("a\n\n\nc\nd");
        assert_eq!(paragraph_forward(&b, p(1, 0)), p(4, 1));
    }

    #[test]
    fn paragraph_count_repeats() {
        let b = buf("a\n\nb\n\nc");
        assert_eq!(Motion::ParagraphForward.resolve(&b, p(0, 0), Some(2)).end, p(3, 0));
    }

    #[test]
    fn current_line_count_spans_lines() {
        let b = buf("1\n2\n3\n4\n5");
        let r = Motion::CurrentLine.resolve(&b, p(1, 0), Some(2));
        assert!(r.is_linewise());
        assert_eq!((r.start.line, r.end.line), (1, 2));
    }
}
