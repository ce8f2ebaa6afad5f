//! Operators: what `d`, `c`, `y`, `>`, `<`, `g~`, `gu` and `gU` do to a
//! resolved [`Range`].
//!
//! An operator never sees keys. The editor resolves a motion (or a visual
//! selection) into a range and hands it here together with the operator
//! count. Every operator normalizes the range first, so backward motions
//! (`dk`, `d0`) behave like their forward mirror.
//!
//! | Keys  | Operator     | Range handling                          |
//! |-------|--------------|-----------------------------------------|
//! | `d`   | delete       | repeated `count` times over the range   |
//! | `c`   | change       | delete, then INSERT                     |
//! | `y`   | yank         | copy only, reports no change            |
//! | `>`   | indent       | line-wise, `shift_width` spaces × count |
//! | `<`   | outdent      | line-wise, up to `shift_width` × count  |
//! | `g~`  | toggle case  | every char in the range                 |
//! | `gu`  | lowercase    | every char in the range                 |
//! | `gU`  | uppercase    | every char in the range                 |

use crate::buffer::EditorBuffer;
use crate::position::{Position, Range, RangeKind};
use crate::register::RegisterKind;
use crate::trie::KeyTrie;

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Delete,
    Change,
    Yank,
    Indent,
    Outdent,
    ToggleCase,
    Lowercase,
    Uppercase,
}

const OPERATOR_KEYS: &[(&str, Operator)] = &[
    ("d", Operator::Delete),
    ("c", Operator::Change),
    ("y", Operator::Yank),
    (">", Operator::Indent),
    ("<", Operator::Outdent),
    ("g~", Operator::ToggleCase),
    ("gu", Operator::Lowercase),
    ("gU", Operator::Uppercase),
];

/// Operators reachable from NORMAL mode.
#[must_use]
pub fn operator_trie() -> KeyTrie<Operator> {
    KeyTrie::from_entries(OPERATOR_KEYS.iter().copied())
}

impl Operator {
    /// The operator a single key triggers on a visual selection.
    #[must_use]
    pub const fn from_visual_key(key: char) -> Option<Self> {
        match key {
            'd' | 'x' => Some(Self::Delete),
            'c' => Some(Self::Change),
            'y' => Some(Self::Yank),
            '>' => Some(Self::Indent),
            '<' => Some(Self::Outdent),
            '~' => Some(Self::ToggleCase),
            'u' => Some(Self::Lowercase),
            'U' => Some(Self::Uppercase),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Applying
// ---------------------------------------------------------------------------

/// The result of one operator application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// The buffer text changed. Yank is always `false`.
    pub changed: bool,
    /// Where the cursor goes afterwards, already clamped.
    pub cursor: Position,
    /// Text for the unnamed register.
    pub captured: Option<(String, RegisterKind)>,
    /// Switch to INSERT afterwards (change).
    pub insert: bool,
}

/// Apply `op` to `range` in `buf`.
///
/// `count` repeats delete and change over the same resolved range (so
/// `2dd` removes two lines) until the range starts past the end of the
/// buffer. It multiplies the indent width. Case operators apply once.
pub fn apply(
    op: Operator,
    buf: &mut EditorBuffer,
    range: Range,
    count: usize,
    shift_width: usize,
) -> Edit {
    let range = range.normalized();
    let count = count.max(1);
    tracing::trace!(?op, ?range, count, "apply operator");

    match op {
        Operator::Delete => delete(buf, range, count),
        Operator::Change if range.is_linewise() => change_lines(buf, range, count),
        Operator::Change => Edit {
            insert: true,
            ..delete(buf, range, count)
        },
        Operator::Yank => Edit {
            changed: false,
            cursor: buf.clamp(range.start),
            captured: Some((buf.slice(range), range.kind.into())),
            insert: false,
        },
        Operator::Indent => shift_lines(buf, range, count * shift_width, true),
        Operator::Outdent => shift_lines(buf, range, count * shift_width, false),
        Operator::ToggleCase => map_case(buf, range, toggle_case),
        Operator::Lowercase => map_case(buf, range, str::to_lowercase),
        Operator::Uppercase => map_case(buf, range, str::to_uppercase),
    }
}

fn delete(buf: &mut EditorBuffer, range: Range, count: usize) -> Edit {
    let mut pieces = Vec::with_capacity(count);
    let mut changed = false;

    for _ in 0..count {
        let before = buf.line_count();
        // The range starts past the end: an earlier pass took the last line.
        if range.start.line >= before {
            break;
        }
        let removed = buf.delete(range);
        let did = range.is_linewise() || !removed.is_empty();
        if !did {
            break;
        }
        changed = true;
        pieces.push(removed);
        // Nothing left to take once an emptied buffer is down to one line.
        if range.is_linewise() && before == 1 {
            break;
        }
    }

    let kind = RegisterKind::from(range.kind);
    let captured = match kind {
        RegisterKind::Line => pieces.join("\n"),
        RegisterKind::Char => pieces.concat(),
    };
    let cursor = match range.kind {
        RangeKind::Line => Position::new(range.start.line, 0),
        RangeKind::Char => range.start,
    };

    Edit {
        changed,
        cursor: buf.clamp(cursor),
        captured: changed.then_some((captured, kind)),
        insert: false,
    }
}

/// `cc`: the covered lines collapse into one empty line to type into.
fn change_lines(buf: &mut EditorBuffer, range: Range, count: usize) -> Edit {
    let first = range.start.line.min(buf.line_count() - 1);
    let last = first
        .saturating_add(range.line_span() * count - 1)
        .min(buf.line_count() - 1);

    let captured = buf.slice(Range::lines(Position::new(first, 0), Position::new(last, 0)));
    if last > first {
        buf.delete(Range::lines(Position::new(first + 1, 0), Position::new(last, 0)));
    }
    buf.replace_line(first, String::new());

    Edit {
        changed: true,
        cursor: Position::new(first, 0),
        captured: Some((captured, RegisterKind::Line)),
        insert: true,
    }
}

fn shift_lines(buf: &mut EditorBuffer, range: Range, width: usize, indent: bool) -> Edit {
    let first = range.start.line.min(buf.line_count() - 1);
    let last = range.end.line.min(buf.line_count() - 1);
    let mut changed = false;

    for idx in first..=last {
        let line = buf.line(idx);
        let next = if indent {
            format!("{}{line}", " ".repeat(width))
        } else {
            let strip = line.chars().take(width).take_while(|&c| c == ' ').count();
            line[strip..].to_owned()
        };
        if next != line {
            buf.replace_line(idx, next);
            changed = true;
        }
    }

    let indent_col = buf.line(first).chars().take_while(|c| c.is_whitespace()).count();
    Edit {
        changed,
        cursor: buf.clamp(Position::new(first, indent_col)),
        captured: None,
        insert: false,
    }
}

fn map_case(buf: &mut EditorBuffer, range: Range, f: impl Fn(&str) -> String) -> Edit {
    let changed = buf.map_span(range, f);
    let cursor = if range.is_linewise() {
        Position::new(range.start.line, 0)
    } else {
        range.start
    };
    Edit {
        changed,
        cursor: buf.clamp(cursor),
        captured: None,
        insert: false,
    }
}

fn toggle_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            let flipped: Vec<char> = if c.is_uppercase() {
                c.to_lowercase().collect()
            } else if c.is_lowercase() {
                c.to_uppercase().collect()
            } else {
                vec![c]
            };
            flipped
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
