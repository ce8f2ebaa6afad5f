//! Editor buffer: one open file as an ordered list of lines.
//!
//! The lines are the authoritative text: a file is never stored as one
//! joined string, so anything addressed by line number is a direct index.
//! A buffer always holds at least one line; an empty file is one empty line.
//!
//! # Design choices
//!
//! - **Columns are char offsets**, not byte offsets. Byte offsets never leak
//!   out of this module.
//!
//! - **Saving is a callback.** The buffer knows nothing about where its text
//!   lives. Whoever opened it hands over an `on_save` hook, and `save` calls
//!   it with the lines rejoined by `\n`.
//!
//! - **`dirty` is set by every mutation** that actually changes text and
//!   cleared by `save`.

use std::fmt;

use crate::position::{Position, Range, RangeKind};

/// Receives the buffer text on `:w`.
pub type SaveHook = Box<dyn FnMut(&str)>;

/// Filename shown for a buffer opened without one.
pub const NO_NAME: &str = "[No Name]";

// ---------------------------------------------------------------------------
// BufferSpec
// ---------------------------------------------------------------------------

/// Everything needed to open one buffer.
pub struct BufferSpec {
    pub filename: String,
    pub text: String,
    pub on_save: Option<SaveHook>,
}

impl BufferSpec {
    #[must_use]
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            on_save: None,
        }
    }

    /// Attach the hook `:w` will call.
    #[must_use]
    pub fn on_save(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.on_save = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for BufferSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferSpec")
            .field("filename", &self.filename)
            .field("text_len", &self.text.len())
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// EditorBuffer
// ---------------------------------------------------------------------------

pub struct EditorBuffer {
    filename: String,
    lines: Vec<String>,
    dirty: bool,
    on_save: Option<SaveHook>,
}

/// A range resolved against actual line contents: clamped, normalized, and
/// with the inclusive flag folded into `end_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    first: usize,
    last: usize,
    start_col: usize,
    end_col: usize,
    linewise: bool,
}

impl EditorBuffer {
    /// Build a buffer from text. `\r\n` is normalized to `\n` before
    /// splitting.
    #[must_use]
    pub fn new(filename: impl Into<String>, text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        Self {
            filename: filename.into(),
            lines: normalized.split('\n').map(str::to_owned).collect(),
            dirty: false,
            on_save: None,
        }
    }

    #[must_use]
    pub fn from_spec(spec: BufferSpec) -> Self {
        let mut buf = Self::new(spec.filename, &spec.text);
        buf.on_save = spec.on_save;
        buf
    }

    /// An empty unnamed buffer.
    #[must_use]
    pub fn scratch() -> Self {
        Self::new(NO_NAME, "")
    }

    // -- Queries ------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Always at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line text, or `""` past the end.
    #[inline]
    #[must_use]
    pub fn line(&self, idx: usize) -> &str {
        self.lines.get(idx).map_or("", String::as_str)
    }

    /// Line length in chars, 0 past the end.
    #[inline]
    #[must_use]
    pub fn line_len(&self, idx: usize) -> usize {
        self.line(idx).chars().count()
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The whole text, lines joined by `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Clamp a position into the buffer: a valid line, `col <= line_len`.
    #[must_use]
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    /// The text a range covers, without changing anything.
    #[must_use]
    pub fn slice(&self, range: Range) -> String {
        let span = self.span(range);
        if span.linewise {
            return self.lines[span.first..=span.last].join("\n");
        }
        if span.first == span.last {
            return char_slice(&self.lines[span.first], span.start_col, span.end_col).to_owned();
        }
        let mut out = char_slice_from(&self.lines[span.first], span.start_col).to_owned();
        for line in &self.lines[span.first + 1..span.last] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(char_slice(&self.lines[span.last], 0, span.end_col));
        out
    }

    // -- Saving -------------------------------------------------------------

    /// Hand the text to the save hook (if any) and clear `dirty`.
    pub fn save(&mut self) {
        let text = self.text();
        if let Some(hook) = self.on_save.as_mut() {
            hook(&text);
        }
        self.dirty = false;
        tracing::debug!(file = %self.filename, bytes = text.len(), "buffer saved");
    }

    // -- Editing primitives -------------------------------------------------

    /// Insert one character; returns the position just after it.
    pub fn insert_char(&mut self, pos: Position, ch: char) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col);
        line.insert(at, ch);
        self.dirty = true;
        Position::new(pos.line, pos.col + 1)
    }

    /// Insert text that may contain newlines; returns the position just
    /// after the last inserted character.
    pub fn insert(&mut self, pos: Position, text: &str) -> Position {
        if text.is_empty() {
            return pos;
        }
        let pos = self.clamp(pos);
        let line = &self.lines[pos.line];
        let at = byte_index(line, pos.col);
        let tail = line[at..].to_owned();
        let head = line[..at].to_owned();

        let mut pieces: Vec<String> = text.split('\n').map(str::to_owned).collect();
        let last_len = pieces.last().map_or(0, |p| p.chars().count());
        let end = if pieces.len() == 1 {
            Position::new(pos.line, pos.col + last_len)
        } else {
            Position::new(pos.line + pieces.len() - 1, last_len)
        };

        pieces[0].insert_str(0, &head);
        if let Some(last) = pieces.last_mut() {
            last.push_str(&tail);
        }
        self.lines.splice(pos.line..=pos.line, pieces);
        self.dirty = true;
        end
    }

    /// Split the line at `pos`; returns column 0 of the new line.
    pub fn split_line(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col);
        let tail = line.split_off(at);
        self.lines.insert(pos.line + 1, tail);
        self.dirty = true;
        Position::new(pos.line + 1, 0)
    }

    /// Backspace at `pos`.
    ///
    /// At column 0 of a non-first line the line merges into the previous
    /// one and the result is the former join point. Otherwise the preceding
    /// character is removed. At (0, 0) nothing happens.
    pub fn backspace(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        if pos.col == 0 {
            if pos.line == 0 {
                return pos;
            }
            let removed = self.lines.remove(pos.line);
            let prev = &mut self.lines[pos.line - 1];
            let join = prev.chars().count();
            prev.push_str(&removed);
            self.dirty = true;
            return Position::new(pos.line - 1, join);
        }
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col - 1);
        line.remove(at);
        self.dirty = true;
        Position::new(pos.line, pos.col - 1)
    }

    /// Insert whole lines before line `at` (`at == line_count` appends).
    pub fn insert_lines(&mut self, at: usize, new_lines: impl IntoIterator<Item = String>) {
        let at = at.min(self.lines.len());
        let before = self.lines.len();
        self.lines.splice(at..at, new_lines);
        if self.lines.len() != before {
            self.dirty = true;
        }
    }

    /// Replace the content of one line. Marks dirty only if it changed.
    pub fn replace_line(&mut self, idx: usize, text: String) {
        if let Some(line) = self.lines.get_mut(idx) {
            if *line != text {
                *line = text;
                self.dirty = true;
            }
        }
    }

    /// Remove the text a range covers and return it.
    ///
    /// - line-wise: whole lines `first..=last` go; an emptied buffer keeps
    ///   one empty line
    /// - char-wise on one line: `[start, end)` is spliced out
    /// - char-wise across lines: the head of the first line joins the tail
    ///   of the last, everything between is dropped
    pub fn delete(&mut self, range: Range) -> String {
        let removed = self.slice(range);
        let span = self.span(range);

        if span.linewise {
            self.lines.drain(span.first..=span.last);
            if self.lines.is_empty() {
                self.lines.push(String::new());
            }
            self.dirty = true;
            return removed;
        }

        if removed.is_empty() {
            return removed;
        }

        let head = char_slice(&self.lines[span.first], 0, span.start_col).to_owned();
        let tail = char_slice_from(&self.lines[span.last], span.end_col).to_owned();
        self.lines
            .splice(span.first..=span.last, std::iter::once(head + &tail));
        self.dirty = true;
        removed
    }

    /// Rewrite every character a range covers with `f`, line by line.
    /// Returns whether any text changed.
    pub fn map_span(&mut self, range: Range, f: impl Fn(&str) -> String) -> bool {
        let span = self.span(range);
        let mut changed = false;

        for idx in span.first..=span.last {
            let line = &self.lines[idx];
            let len = line.chars().count();
            let (from, to) = if span.linewise {
                (0, len)
            } else {
                let from = if idx == span.first { span.start_col } else { 0 };
                let to = if idx == span.last { span.end_col } else { len };
                (from, to)
            };
            if from >= to {
                continue;
            }

            let a = byte_index(line, from);
            let b = byte_index(line, to);
            let mapped = f(&line[a..b]);
            if mapped != line[a..b] {
                let mut next = String::with_capacity(line.len());
                next.push_str(&line[..a]);
                next.push_str(&mapped);
                next.push_str(&line[b..]);
                self.lines[idx] = next;
                changed = true;
            }
        }

        if changed {
            self.dirty = true;
        }
        changed
    }

    // -- Internals ----------------------------------------------------------

    fn span(&self, range: Range) -> Span {
        let r = range.normalized();
        let max_line = self.lines.len() - 1;
        let first = r.start.line.min(max_line);
        let last = r.end.line.min(max_line);

        if r.kind == RangeKind::Line {
            return Span {
                first,
                last,
                start_col: 0,
                end_col: self.line_len(last),
                linewise: true,
            };
        }

        let start_col = r.start.col.min(self.line_len(first));
        let end_col = if r.inclusive { r.end.col + 1 } else { r.end.col };
        let end_col = end_col.min(self.line_len(last));
        let end_col = if first == last { end_col.max(start_col) } else { end_col };

        Span {
            first,
            last,
            start_col,
            end_col,
            linewise: false,
        }
    }
}

impl fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("filename", &self.filename)
            .field("lines", &self.lines.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Char/byte helpers
// ---------------------------------------------------------------------------

/// Byte offset of char column `col`, or the string length past the end.
#[must_use]
pub fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(i, _)| i)
}

fn char_slice(s: &str, from: usize, to: usize) -> &str {
    let a = byte_index(s, from);
    let b = byte_index(s, to.max(from));
    &s[a..b]
}

fn char_slice_from(s: &str, from: usize) -> &str {
    &s[byte_index(s, from)..]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
