//! Register: storage for yanked and deleted text.
//!
//! Every delete, change and yank copies the text it covered into the
//! unnamed register. `p` and `P` paste it back.
//!
//! The register remembers whether the text was captured character-wise or
//! line-wise, because paste behaves differently for each:
//!
//! - **Char-wise**: `p` inserts after the cursor, `P` at the cursor.
//! - **Line-wise**: `p` inserts whole lines below, `P` above.

use crate::buffer::EditorBuffer;
use crate::position::{Position, RangeKind};

/// How the register content was captured. Decides paste behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    Char,
    Line,
}

impl From<RangeKind> for RegisterKind {
    fn from(kind: RangeKind) -> Self {
        match kind {
            RangeKind::Char => Self::Char,
            RangeKind::Line => Self::Line,
        }
    }
}

/// Where `p`/`P` put the text relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteSide {
    /// `p`: after the cursor, or below the cursor line.
    After,
    /// `P`: at the cursor, or above the cursor line.
    Before,
}

/// The unnamed register.
#[derive(Debug, Clone)]
pub struct Register {
    content: String,
    kind: RegisterKind,
}

impl Register {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
            kind: RegisterKind::Char,
        }
    }

    /// Replace the content.
    pub fn store(&mut self, text: String, kind: RegisterKind) {
        tracing::trace!(bytes = text.len(), ?kind, "register store");
        self.content = text;
        self.kind = kind;
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// Nothing to paste. A line-wise register holding `""` is one empty
    /// line, not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.kind == RegisterKind::Char
    }

    /// Paste into `buf` relative to `cursor`, `count` times.
    ///
    /// Returns the new cursor position, or `None` when the register is
    /// empty and nothing changed. Line-wise pastes land on the first pasted
    /// line; char-wise pastes land on the last pasted character.
    pub fn paste(
        &self,
        buf: &mut EditorBuffer,
        cursor: Position,
        side: PasteSide,
        count: usize,
    ) -> Option<Position> {
        if self.is_empty() {
            return None;
        }
        let count = count.max(1);

        match self.kind {
            RegisterKind::Line => {
                let at = match side {
                    PasteSide::After => cursor.line + 1,
                    PasteSide::Before => cursor.line,
                };
                let lines: Vec<String> = std::iter::repeat_n(self.content.as_str(), count)
                    .flat_map(|chunk| chunk.split('\n'))
                    .map(str::to_owned)
                    .collect();
                buf.insert_lines(at, lines);
                Some(buf.clamp(Position::new(at, 0)))
            }
            RegisterKind::Char => {
                let col = match side {
                    PasteSide::After if buf.line_len(cursor.line) > 0 => cursor.col + 1,
                    _ => cursor.col,
                };
                let text = self.content.repeat(count);
                let end = buf.insert(Position::new(cursor.line, col), &text);
                Some(buf.clamp(Position::new(end.line, end.col.saturating_sub(1))))
            }
        }
    }
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
