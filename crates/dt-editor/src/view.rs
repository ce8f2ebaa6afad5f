//! View: scroll state and the full-screen frame.
//!
//! Every state change redraws the whole screen as one string. There is no
//! diffing: the frame is small and a terminal widget accepts it in one
//! write.
//!
//! ```text
//!  [notes.txt*]   todo.txt              <- tab bar (inverse)
//!  3 │first line
//!  1 │second line
//!  3 │cursor line                       <- absolute number on the cursor
//!  1 │fourth line                          line, distance elsewhere
//!  ~ │
//! normal        notes.txt [+]  3,1      <- status line (inverse)
//! ```
//!
//! Widths are measured in display cells (`unicode-width`) for the tab and
//! status bars. Buffer columns are chars; the body clips by chars.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use dt_term::Size;
use dt_term::ansi::{CLEAR_AND_HOME, CursorTo, ERASE_TO_EOL, INVERSE, INVERSE_OFF, RESET};

use crate::buffer::EditorBuffer;
use crate::mode::Mode;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Columns taken by the line-number gutter, separator included.
///
/// | Lines   | Gutter |
/// |---------|--------|
/// | 1–99    | 4      |
/// | 100–999 | 5      |
#[must_use]
pub fn gutter_width(line_count: usize) -> usize {
    let digits = line_count.max(1).ilog10() as usize + 1;
    digits.max(2) + 2
}

/// The visible window onto the active buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible line.
    pub top: usize,
    /// First visible column (chars).
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            top: 0,
            left: 0,
            rows: usize::from(size.rows),
            cols: usize::from(size.cols),
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.rows = usize::from(size.rows);
        self.cols = usize::from(size.cols);
    }

    /// Rows between the tab bar and the status line.
    #[must_use]
    pub fn body_height(&self) -> usize {
        self.rows.saturating_sub(2).max(1)
    }

    #[must_use]
    pub fn body_width(&self, gutter: usize) -> usize {
        self.cols.saturating_sub(gutter).max(1)
    }

    /// Lines moved by Ctrl-d / Ctrl-u.
    #[must_use]
    pub fn half_page(&self) -> usize {
        (self.rows.saturating_sub(2) / 2).max(1)
    }

    /// Scroll so `cursor` is inside the body.
    pub fn ensure_visible(&mut self, cursor: Position, gutter: usize) {
        let body_h = self.body_height();
        let body_w = self.body_width(gutter);

        if cursor.line < self.top {
            self.top = cursor.line;
        }
        if cursor.line >= self.top + body_h {
            self.top = cursor.line + 1 - body_h;
        }
        if cursor.col < self.left {
            self.left = cursor.col;
        }
        if cursor.col >= self.left + body_w {
            self.left = cursor.col + 1 - body_w;
        }
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Everything the renderer reads. Borrowed from the editor for one draw.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub buffers: &'a [EditorBuffer],
    pub active: usize,
    pub mode: Mode,
    /// Text after `:` while in CMDLINE.
    pub cmdline: &'a str,
    pub cursor: Position,
    /// The visual selection, normalized, inclusive.
    pub selection: Option<Range>,
    pub viewport: Viewport,
}

/// Render the full screen.
#[must_use]
pub fn render(frame: &Frame<'_>) -> String {
    let Some(buf) = frame.buffers.get(frame.active) else {
        return String::from(CLEAR_AND_HOME);
    };
    let vp = frame.viewport;
    let body_h = vp.body_height();
    let gw = gutter_width(buf.line_count());
    let body_w = vp.body_width(gw);

    let mut out = String::with_capacity(vp.rows * (vp.cols + 16));
    out.push_str(CLEAR_AND_HOME);

    // Tab bar.
    let tabs: String = frame
        .buffers
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let star = if b.is_dirty() { "*" } else { "" };
            if i == frame.active {
                format!(" [{}{star}] ", b.filename())
            } else {
                format!("  {}{star}  ", b.filename())
            }
        })
        .collect();
    out.push_str(INVERSE);
    out.push_str(&fit_width(&tabs, vp.cols));
    out.push_str(RESET);
    out.push_str("\r\n");

    // Body.
    for r in 0..body_h {
        let idx = vp.top + r;
        if idx >= buf.line_count() {
            out.push_str(&format!("{:<w$} │", "~", w = gw - 2));
        } else {
            let num = if idx == frame.cursor.line {
                idx + 1
            } else {
                idx.abs_diff(frame.cursor.line)
            };
            out.push_str(&format!("{num:>w$} │", w = gw - 2));
            let chars: Vec<char> = buf.line(idx).chars().collect();
            let from = vp.left.min(chars.len());
            let to = (vp.left + body_w).min(chars.len());
            let visible = &chars[from..to];

            match frame.selection.and_then(|sel| selected_cols(sel, idx, chars.len())) {
                Some((a, b)) if a.max(from) < b.min(to) => {
                    let (a, b) = (a.max(from) - from, b.min(to) - from);
                    out.extend(&visible[..a]);
                    out.push_str(INVERSE);
                    out.extend(&visible[a..b]);
                    out.push_str(INVERSE_OFF);
                    out.extend(&visible[b..]);
                }
                _ => out.extend(visible),
            }
        }
        out.push_str(ERASE_TO_EOL);
        if r + 1 < body_h {
            out.push_str("\r\n");
        }
    }

    // Status line.
    let left = if frame.mode == Mode::CmdLine {
        format!(":{}", frame.cmdline)
    } else {
        frame.mode.display_name().to_owned()
    };
    let dirty = if buf.is_dirty() { " [+]" } else { "" };
    let right = format!(
        "{}{dirty}  {},{}",
        buf.filename(),
        frame.cursor.line + 1,
        frame.cursor.col + 1
    );
    let pad = vp
        .cols
        .saturating_sub(left.width() + right.width() + 1)
        .max(1);
    let status = format!("{left}{}{right}", " ".repeat(pad));
    out.push_str("\r\n");
    out.push_str(INVERSE);
    out.push_str(&fit_width(&status, vp.cols));
    out.push_str(RESET);

    // Cursor.
    let cur_row = frame.cursor.line.saturating_sub(vp.top).min(body_h - 1);
    let cur_col = gw + frame.cursor.col.saturating_sub(vp.left).min(body_w - 1);
    // Row 0 is the tab bar.
    out.push_str(&CursorTo { x: cur_col, y: cur_row + 1 }.to_string());

    out
}

/// Columns `[from, to)` of line `idx` inside the selection.
fn selected_cols(sel: Range, idx: usize, len: usize) -> Option<(usize, usize)> {
    if idx < sel.start.line || idx > sel.end.line {
        return None;
    }
    if sel.is_linewise() {
        return Some((0, len));
    }
    let from = if idx == sel.start.line { sel.start.col } else { 0 };
    let to = if idx == sel.end.line {
        (sel.end.col + 1).min(len)
    } else {
        len
    };
    Some((from, to))
}

/// Clip or pad `s` to exactly `cols` display cells.
fn fit_width(s: &str, cols: usize) -> String {
    let mut out = String::with_capacity(cols);
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > cols {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(cols - used));
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::VisualKind;
    use pretty_assertions::assert_eq;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn frame<'a>(buffers: &'a [EditorBuffer], cols: u16, rows: u16) -> Frame<'a> {
        Frame {
            buffers,
            active: 0,
            mode: Mode::Normal,
            cmdline: "",
            cursor: p(0, 0),
            selection: None,
            viewport: Viewport::new(Size { cols, rows }),
        }
    }

    #[test]
    fn gutter_grows_with_digits() {
        assert_eq!(gutter_width(0), 4);
        assert_eq!(gutter_width(99), 4);
        assert_eq!(gutter_width(100), 5);
        assert_eq!(gutter_width(12_345), 7);
    }

    #[test]
    fn half_page_never_zero() {
        assert_eq!(Viewport::new(Size { cols: 80, rows: 24 }).half_page(), 11);
        assert_eq!(Viewport::new(Size { cols: 80, rows: 3 }).half_page(), 1);
    }

    #[test]
    fn full_frame_layout() {
        let bufs = [EditorBuffer::new("a.txt", "hi\nyo")];
        let got = render(&frame(&bufs, 20, 4));
        let expected = [
            "\x1b[2J\x1b[H",
            "\x1b[7m",
            &format!(" [a.txt] {}", " ".repeat(11)),
            "\x1b[0m\r\n",
            " 1 │hi\x1b[K\r\n",
            " 1 │yo\x1b[K",
            "\r\n\x1b[7mnormal   a.txt  1,1 \x1b[0m",
            "\x1b[2;5H",
        ]
        .concat();
        assert_eq!(got, expected);
    }

    #[test]
    fn tilde_rows_past_end() {
        let bufs = [EditorBuffer::new("f", "x")];
        let got = render(&frame(&bufs, 20, 5));
        assert!(got.contains(" 1 │x\x1b[K\r\n~  │\x1b[K\r\n~  │\x1b[K"));
    }

    #[test]
    fn inactive_tabs_and_dirty_markers() {
        let mut a = EditorBuffer::new("a", "");
        a.insert_char(p(0, 0), 'z');
        let bufs = [a, EditorBuffer::new("b", "")];
        let got = render(&frame(&bufs, 30, 4));
        assert!(got.contains(" [a*]   b  "));
        assert!(got.contains("a [+]  1,1"));
    }

    #[test]
    fn relative_numbers_around_cursor() {
        let bufs = [EditorBuffer::new("f", "a\nb\nc\nd")];
        let mut f = frame(&bufs, 20, 6);
        f.cursor = p(2, 0);
        let got = render(&f);
        assert!(got.contains(" 2 │a"));
        assert!(got.contains(" 1 │b"));
        assert!(got.contains(" 3 │c"));
        assert!(got.contains(" 1 │d"));
        assert!(got.ends_with("\x1b[4;5H"));
    }

    #[test]
    fn cmdline_replaces_mode_name() {
        let bufs = [EditorBuffer::new("f", "")];
        let mut f = frame(&bufs, 20, 4);
        f.mode = Mode::CmdLine;
        f.cmdline = "wq";
        assert!(render(&f).contains("\x1b[7m:wq"));
    }

    #[test]
    fn charwise_selection_is_inverted() {
        let bufs = [EditorBuffer::new("f", "abcdef")];
        let mut f = frame(&bufs, 20, 4);
        f.mode = Mode::Visual(VisualKind::Char);
        f.selection = Some(Range::chars_inclusive(p(0, 1), p(0, 3)));
        assert!(render(&f).contains(" 1 │a\x1b[7mbcd\x1b[27mef\x1b[K"));
    }

    #[test]
    fn linewise_selection_covers_rows() {
        let bufs = [EditorBuffer::new("f", "ab\ncd\nef")];
        let mut f = frame(&bufs, 20, 6);
        f.selection = Some(Range::lines(p(0, 1), p(1, 0)));
        let got = render(&f);
        assert!(got.contains("│\x1b[7mab\x1b[27m"));
        assert!(got.contains("│\x1b[7mcd\x1b[27m"));
        assert!(got.contains("│ef\x1b[K"));
    }

    #[test]
    fn horizontal_scroll_clips_body() {
        let bufs = [EditorBuffer::new("f", "0123456789abcdef")];
        let mut f = frame(&bufs, 10, 4);
        f.cursor = p(0, 12);
        f.viewport.ensure_visible(f.cursor, gutter_width(1));
        assert_eq!(f.viewport.left, 7);
        let got = render(&f);
        assert!(got.contains(" 1 │789abc\x1b[K"));
        assert!(got.ends_with("\x1b[2;10H"));
    }

    #[test]
    fn ensure_visible_scrolls_vertically() {
        let mut vp = Viewport::new(Size { cols: 20, rows: 5 });
        vp.ensure_visible(p(10, 0), 4);
        assert_eq!(vp.top, 8);
        vp.ensure_visible(p(2, 0), 4);
        assert_eq!(vp.top, 2);
    }

    #[test]
    fn wide_chars_are_clipped_by_cells() {
        assert_eq!(fit_width("日本語", 5), "日本 ");
        assert_eq!(fit_width("ab", 4), "ab  ");
    }
}
