//! The modal editor: key dispatch, composition state, and buffers.
//!
//! An [`Editor`] owns one or more [`EditorBuffer`]s, a cursor, the current
//! [`Mode`] and the viewport. It consumes one [`KeyEvent`] at a time and the
//! host redraws with [`Editor::screen`] afterwards.
//!
//! # NORMAL-mode grammar
//!
//! ```text
//! [count1] operator [count2] motion      d2w, 3dd, gUU
//! [count1] motion                        2j, 5G, gg
//! [count1] immediate                     x, 3x, p, i, o, :
//! ```
//!
//! Operators and motions live in two [`KeyTrie`]s walked in parallel, one
//! cursor per trie. When the same key completes an operator and a motion,
//! the operator wins. Once an operator is pending, a third trie (motions
//! plus the "same key again" current-line entries) finishes the command.
//! Any dead end drops the whole composition at once.
//!
//! Arrow keys and Ctrl-d / Ctrl-u are handled before any of this, in every
//! mode, and cancel a pending composition.

use dt_term::{KeyCode, KeyEvent, Modifiers, Size};

use crate::buffer::{BufferSpec, EditorBuffer};
use crate::command::{Command, CommandLine};
use crate::mode::{Mode, VisualKind};
use crate::motion::{Motion, motion_trie, pending_motion_trie};
use crate::operator::{self, Operator, operator_trie};
use crate::position::{Position, Range};
use crate::register::{PasteSide, Register};
use crate::trie::{KeyTrie, Step, TrieCursor};
use crate::view::{self, Frame, Viewport, gutter_width};

/// Indent unit for `>` and `<` unless configured otherwise.
pub const DEFAULT_SHIFT_WIDTH: usize = 2;

/// Counts beyond this are clamped while typing.
const MAX_COUNT: usize = 99_999;

// ---------------------------------------------------------------------------
// Events and records
// ---------------------------------------------------------------------------

/// What the host should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// Keep routing keys here and redraw.
    Continue,
    /// The editor is done. `saved` is true for `:wq` / `:x`.
    Exit { saved: bool },
}

/// The last successful operator change, replayed by `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastChange {
    pub operator: Operator,
    pub motion: Motion,
    pub count1: Option<usize>,
    pub count2: Option<usize>,
}

/// Transient NORMAL-mode state between the first key of a command and the
/// key that completes it.
///
/// A walk that has died is `None`; the other walk may still be alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Composition {
    count1: Option<usize>,
    operator: Option<Operator>,
    count2: Option<usize>,
    operator_walk: Option<TrieCursor>,
    motion_walk: Option<TrieCursor>,
}

impl Composition {
    const IDLE: Self = Self {
        count1: None,
        operator: None,
        count2: None,
        operator_walk: Some(TrieCursor::ROOT),
        motion_walk: Some(TrieCursor::ROOT),
    };

    /// True when no key of a multi-key sequence has been consumed yet.
    fn at_root(&self) -> bool {
        self.operator_walk.is_none_or(TrieCursor::is_root)
            && self.motion_walk.is_none_or(TrieCursor::is_root)
    }
}

fn push_digit(count: Option<usize>, digit: u32) -> Option<usize> {
    let next = count.unwrap_or(0) * 10 + digit as usize;
    Some(next.min(MAX_COUNT))
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

pub struct Editor {
    buffers: Vec<EditorBuffer>,
    /// Index into `buffers`.
    active: usize,
    /// Cursor remembered per buffer while it is in the background.
    parked: Vec<Position>,
    cursor: Position,
    mode: Mode,
    /// Fixed end of the visual selection. `Some` only in VISUAL mode.
    anchor: Option<Position>,
    viewport: Viewport,
    cmdline: CommandLine,
    pending: Composition,
    operators: KeyTrie<Operator>,
    motions: KeyTrie<Motion>,
    pending_motions: KeyTrie<Motion>,
    register: Register,
    last_change: Option<LastChange>,
    shift_width: usize,
}

impl Editor {
    /// Open `specs` as buffers. With no specs, a single unnamed scratch
    /// buffer is opened.
    #[must_use]
    pub fn new(specs: Vec<BufferSpec>, size: Size) -> Self {
        let mut buffers: Vec<EditorBuffer> =
            specs.into_iter().map(EditorBuffer::from_spec).collect();
        if buffers.is_empty() {
            buffers.push(EditorBuffer::scratch());
        }
        tracing::debug!(buffers = buffers.len(), "editor opened");

        Self {
            parked: vec![Position::ZERO; buffers.len()],
            buffers,
            active: 0,
            cursor: Position::ZERO,
            mode: Mode::Normal,
            anchor: None,
            viewport: Viewport::new(size),
            cmdline: CommandLine::new(),
            pending: Composition::IDLE,
            operators: operator_trie(),
            motions: motion_trie(),
            pending_motions: pending_motion_trie(),
            register: Register::new(),
            last_change: None,
            shift_width: DEFAULT_SHIFT_WIDTH,
        }
    }

    /// Set the indent unit for `>` / `<`.
    #[must_use]
    pub fn with_shift_width(mut self, width: usize) -> Self {
        self.shift_width = width.max(1);
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    #[must_use]
    pub const fn active(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn buffers(&self) -> &[EditorBuffer] {
        &self.buffers
    }

    #[must_use]
    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffers[self.active]
    }

    #[must_use]
    pub fn cmdline(&self) -> &str {
        self.cmdline.input()
    }

    #[must_use]
    pub const fn register(&self) -> &Register {
        &self.register
    }

    #[must_use]
    pub const fn last_change(&self) -> Option<LastChange> {
        self.last_change
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// True while a count, operator, or multi-key prefix is half typed.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.pending != Composition::IDLE
    }

    /// The visual selection as an operator would see it.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        let anchor = self.anchor?;
        match self.mode {
            Mode::Visual(VisualKind::Char) => {
                Some(Range::chars_inclusive(anchor, self.cursor).normalized())
            }
            Mode::Visual(VisualKind::Line) => Some(Range::lines(anchor, self.cursor).normalized()),
            _ => None,
        }
    }

    // -- Host interface -----------------------------------------------------

    /// The full screen for the current state.
    #[must_use]
    pub fn screen(&self) -> String {
        view::render(&Frame {
            buffers: &self.buffers,
            active: self.active,
            mode: self.mode,
            cmdline: self.cmdline.input(),
            cursor: self.cursor,
            selection: self.selection(),
            viewport: self.viewport,
        })
    }

    /// Adopt a new terminal size.
    pub fn resize(&mut self, size: Size) {
        self.viewport.resize(size);
        self.scroll_to_cursor();
    }

    /// Handle one key.
    pub fn on_key(&mut self, key: KeyEvent) -> EditorEvent {
        if self.on_global_key(key) {
            self.scroll_to_cursor();
            return EditorEvent::Continue;
        }

        let event = match self.mode {
            Mode::Normal => {
                self.on_normal(key);
                EditorEvent::Continue
            }
            Mode::Insert => {
                self.on_insert(key);
                EditorEvent::Continue
            }
            Mode::Visual(kind) => {
                self.on_visual(kind, key);
                EditorEvent::Continue
            }
            Mode::CmdLine => self.on_cmdline(key),
        };

        self.cursor = self.buffer().clamp(self.cursor);
        self.scroll_to_cursor();
        event
    }

    // -- Global keys --------------------------------------------------------

    /// Arrows and half-page scrolling. Returns `true` if the key was used.
    fn on_global_key(&mut self, key: KeyEvent) -> bool {
        let Position { line, col } = self.cursor;
        let target = match key.code {
            KeyCode::Up => Position::new(line.saturating_sub(1), col),
            KeyCode::Down => Position::new(line + 1, col),
            KeyCode::Left => Position::new(line, col.saturating_sub(1)),
            KeyCode::Right => Position::new(line, col + 1),
            _ if key.is_ctrl('d') => {
                self.scroll_half_page(true);
                return true;
            }
            _ if key.is_ctrl('u') => {
                self.scroll_half_page(false);
                return true;
            }
            _ => return false,
        };
        if self.is_composing() {
            tracing::debug!("arrow key cancels pending composition");
        }
        self.pending = Composition::IDLE;
        self.cursor = self.buffer().clamp(target);
        true
    }

    fn scroll_half_page(&mut self, down: bool) {
        self.pending = Composition::IDLE;
        let half = self.viewport.half_page();
        let last = self.buffer().line_count() - 1;

        if down {
            self.viewport.top = (self.viewport.top + half).min(last);
            self.cursor.line = (self.cursor.line + half).min(last);
        } else {
            self.viewport.top = self.viewport.top.saturating_sub(half);
            self.cursor.line = self.cursor.line.saturating_sub(half);
        }

        let bottom = self.viewport.top + self.viewport.body_height() - 1;
        self.cursor.line = self.cursor.line.clamp(self.viewport.top, bottom.min(last));
        self.cursor = self.buffer().clamp(self.cursor);
    }

    fn scroll_to_cursor(&mut self) {
        let gw = gutter_width(self.buffer().line_count());
        self.viewport.ensure_visible(self.cursor, gw);
    }

    // -- NORMAL -------------------------------------------------------------

    fn on_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Escape => {
                self.pending = Composition::IDLE;
                return;
            }
            KeyCode::Tab => {
                self.pending = Composition::IDLE;
                let back = key.modifiers.contains(Modifiers::SHIFT);
                self.switch_buffer(back);
                return;
            }
            _ => {}
        }
        let Some(ch) = key.printable() else {
            self.pending = Composition::IDLE;
            return;
        };

        if let Some(op) = self.pending.operator {
            self.on_operator_pending(op, ch);
            return;
        }

        if self.pending.at_root() {
            if let Some(digit) = ch.to_digit(10) {
                if digit != 0 || self.pending.count1.is_some() {
                    self.pending.count1 = push_digit(self.pending.count1, digit);
                    return;
                }
            }
            if self.on_immediate(ch) {
                return;
            }
        }

        self.walk_normal(ch);
    }

    /// Feed `ch` to the operator and motion tries in parallel.
    fn walk_normal(&mut self, ch: char) {
        let op_step = self
            .pending
            .operator_walk
            .map_or(Step::Dead, |c| self.operators.step(c, ch));
        let motion_step = self
            .pending
            .motion_walk
            .map_or(Step::Dead, |c| self.motions.step(c, ch));

        match op_step {
            Step::Accept {
                value, more: false, ..
            } => {
                tracing::debug!(operator = ?value, count1 = ?self.pending.count1, "operator pending");
                self.pending.operator = Some(value);
                self.pending.operator_walk = Some(TrieCursor::ROOT);
                self.pending.motion_walk = Some(TrieCursor::ROOT);
                return;
            }
            Step::Accept { cursor, .. } | Step::Partial(cursor) => {
                self.pending.operator_walk = Some(cursor);
            }
            Step::Dead => self.pending.operator_walk = None,
        }

        match motion_step {
            Step::Accept { value, .. } => {
                let range = value.resolve(self.buffer(), self.cursor, self.pending.count1);
                self.cursor = self.buffer().clamp(range.end);
                self.pending = Composition::IDLE;
            }
            Step::Partial(cursor) => self.pending.motion_walk = Some(cursor),
            Step::Dead => self.pending.motion_walk = None,
        }

        if self.pending.operator_walk.is_none() && self.pending.motion_walk.is_none() {
            tracing::trace!(key = %ch, "dead key sequence");
            self.pending = Composition::IDLE;
        }
    }

    fn on_operator_pending(&mut self, op: Operator, ch: char) {
        let walk = self.pending.motion_walk.unwrap_or(TrieCursor::ROOT);

        if walk.is_root() {
            if let Some(digit) = ch.to_digit(10) {
                if digit != 0 || self.pending.count2.is_some() {
                    self.pending.count2 = push_digit(self.pending.count2, digit);
                    return;
                }
            }
        }

        match self.pending_motions.step(walk, ch) {
            Step::Accept { value, .. } => {
                let Composition { count1, count2, .. } = self.pending;
                self.pending = Composition::IDLE;
                self.run_operator(op, value, count1, count2);
            }
            Step::Partial(cursor) => self.pending.motion_walk = Some(cursor),
            Step::Dead => {
                tracing::trace!(key = %ch, "operator cancelled");
                self.pending = Composition::IDLE;
            }
        }
    }

    /// Resolve `motion` and apply `op` to it.
    fn run_operator(
        &mut self,
        op: Operator,
        motion: Motion,
        count1: Option<usize>,
        count2: Option<usize>,
    ) {
        let range = motion.resolve_for_operator(self.buffer(), self.cursor, count2);
        let edit = operator::apply(
            op,
            &mut self.buffers[self.active],
            range,
            count1.unwrap_or(1),
            self.shift_width,
        );

        if let Some((text, kind)) = edit.captured {
            self.register.store(text, kind);
        }
        self.cursor = edit.cursor;
        if edit.insert {
            self.set_mode(Mode::Insert);
        }
        if edit.changed {
            self.last_change = Some(LastChange {
                operator: op,
                motion,
                count1,
                count2,
            });
        }
    }

    /// Commands outside the operator/motion grammar. Returns `false` if
    /// `ch` is not one of them.
    fn on_immediate(&mut self, ch: char) -> bool {
        let count = self.pending.count1;
        let Position { line, col } = self.cursor;

        match ch {
            'i' => self.set_mode(Mode::Insert),
            'I' => {
                self.cursor.col = 0;
                self.set_mode(Mode::Insert);
            }
            'a' => {
                self.cursor.col = (col + 1).min(self.buffer().line_len(line));
                self.set_mode(Mode::Insert);
            }
            'A' => {
                self.cursor.col = self.buffer().line_len(line);
                self.set_mode(Mode::Insert);
            }
            'o' | 'O' => {
                let at = if ch == 'o' { line + 1 } else { line };
                self.buffers[self.active].insert_lines(at, std::iter::once(String::new()));
                self.cursor = Position::new(at, 0);
                self.set_mode(Mode::Insert);
            }
            // `x` is `dl`.
            'x' => self.run_operator(Operator::Delete, Motion::Right, None, Some(count.unwrap_or(1))),
            ':' => {
                self.cmdline.clear();
                self.set_mode(Mode::CmdLine);
            }
            'v' | 'V' => {
                let kind = if ch == 'v' { VisualKind::Char } else { VisualKind::Line };
                self.anchor = Some(self.cursor);
                self.set_mode(Mode::Visual(kind));
            }
            'p' | 'P' => {
                let side = if ch == 'p' { PasteSide::After } else { PasteSide::Before };
                let buf = &mut self.buffers[self.active];
                if let Some(at) = self.register.paste(buf, self.cursor, side, count.unwrap_or(1)) {
                    self.cursor = at;
                }
            }
            '.' => {
                if let Some(last) = self.last_change {
                    let count1 = count.or(last.count1);
                    tracing::debug!(?last, ?count1, "repeat last change");
                    self.run_operator(last.operator, last.motion, count1, last.count2);
                }
            }
            _ => return false,
        }

        self.pending = Composition::IDLE;
        true
    }

    fn switch_buffer(&mut self, back: bool) {
        let n = self.buffers.len();
        if n < 2 {
            return;
        }
        self.parked[self.active] = self.cursor;
        self.active = if back { (self.active + n - 1) % n } else { (self.active + 1) % n };
        self.cursor = self.buffer().clamp(self.parked[self.active]);
        self.viewport.top = 0;
        self.viewport.left = 0;
        tracing::debug!(active = self.active, file = %self.buffer().filename(), "switched buffer");
    }

    // -- INSERT -------------------------------------------------------------

    fn on_insert(&mut self, key: KeyEvent) {
        let buf = &mut self.buffers[self.active];
        match key.code {
            KeyCode::Escape => self.set_mode(Mode::Normal),
            KeyCode::Enter => self.cursor = buf.split_line(self.cursor),
            KeyCode::Backspace => self.cursor = buf.backspace(self.cursor),
            _ => {
                if let Some(ch) = key.printable() {
                    self.cursor = buf.insert_char(self.cursor, ch);
                }
            }
        }
    }

    // -- VISUAL -------------------------------------------------------------

    fn on_visual(&mut self, kind: VisualKind, key: KeyEvent) {
        if key.code == KeyCode::Escape {
            self.leave_visual(Mode::Normal);
            return;
        }
        let Some(ch) = key.printable() else {
            return;
        };

        let at_root = self.pending.motion_walk.is_none_or(TrieCursor::is_root);
        if at_root {
            if let Some(digit) = ch.to_digit(10) {
                if digit != 0 || self.pending.count1.is_some() {
                    self.pending.count1 = push_digit(self.pending.count1, digit);
                    return;
                }
            }
            if let Some(other) = VisualKind::from_key(ch) {
                if other == kind {
                    self.leave_visual(Mode::Normal);
                } else {
                    self.pending = Composition::IDLE;
                    self.set_mode(Mode::Visual(other));
                }
                return;
            }
            if let Some(op) = Operator::from_visual_key(ch) {
                self.apply_visual(op);
                return;
            }
        }

        let walk = self.pending.motion_walk.unwrap_or(TrieCursor::ROOT);
        match self.motions.step(walk, ch) {
            Step::Accept { value, .. } => {
                let range = value.resolve(self.buffer(), self.cursor, self.pending.count1);
                self.cursor = self.buffer().clamp(range.end);
                self.pending = Composition::IDLE;
            }
            Step::Partial(cursor) => self.pending.motion_walk = Some(cursor),
            Step::Dead => self.pending = Composition::IDLE,
        }
    }

    /// Apply `op` to the selection with a count of 1, then leave VISUAL.
    fn apply_visual(&mut self, op: Operator) {
        let Some(range) = self.selection() else {
            self.leave_visual(Mode::Normal);
            return;
        };
        let edit = operator::apply(op, &mut self.buffers[self.active], range, 1, self.shift_width);
        if let Some((text, kind)) = edit.captured {
            self.register.store(text, kind);
        }
        self.cursor = edit.cursor;
        self.leave_visual(Mode::Normal);
    }

    fn leave_visual(&mut self, next: Mode) {
        self.anchor = None;
        self.pending = Composition::IDLE;
        self.set_mode(next);
    }

    // -- CMDLINE ------------------------------------------------------------

    fn on_cmdline(&mut self, key: KeyEvent) -> EditorEvent {
        match key.code {
            KeyCode::Escape => {
                self.cmdline.clear();
                self.set_mode(Mode::Normal);
            }
            KeyCode::Backspace => {
                self.cmdline.backspace();
            }
            KeyCode::Enter => {
                let cmd = self.cmdline.take();
                tracing::debug!(?cmd, "command line");
                match cmd {
                    Command::Quit => return EditorEvent::Exit { saved: false },
                    Command::WriteQuit => {
                        self.buffers[self.active].save();
                        return EditorEvent::Exit { saved: true };
                    }
                    Command::Write => self.buffers[self.active].save(),
                    Command::Unknown(_) => {}
                }
                self.set_mode(Mode::Normal);
            }
            _ => {
                if let Some(ch) = key.printable() {
                    self.cmdline.push(ch);
                }
            }
        }
        EditorEvent::Continue
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "mode change");
            self.mode = mode;
        }
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("buffers", &self.buffers.len())
            .field("active", &self.active)
            .field("cursor", &self.cursor)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::RegisterKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SIZE: Size = Size { cols: 40, rows: 12 };

    fn editor(text: &str) -> Editor {
        Editor::new(vec![BufferSpec::new("t.txt", text)], SIZE)
    }

    fn keys(ed: &mut Editor, input: &str) -> EditorEvent {
        let mut last = EditorEvent::Continue;
        for ch in input.chars() {
            let key = match ch {
                '\x1b' => KeyEvent::plain(KeyCode::Escape),
                '\r' => KeyEvent::plain(KeyCode::Enter),
                '\x7f' => KeyEvent::plain(KeyCode::Backspace),
                c => KeyEvent::char(c),
            };
            last = ed.on_key(key);
        }
        last
    }

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    #[test]
    fn starts_in_normal_at_origin() {
        let ed = editor("abc");
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.cursor(), p(0, 0));
    }

    #[test]
    fn no_specs_opens_scratch() {
        let ed = Editor::new(Vec::new(), SIZE);
        assert_eq!(ed.buffers().len(), 1);
        assert_eq!(ed.buffer().filename(), "[No Name]");
        assert_eq!(ed.buffer().lines(), [""]);
    }

    #[test]
    fn count_then_down() {
        let mut ed = editor("a\nb\nc");
        keys(&mut ed, "2j");
        assert_eq!(ed.cursor(), p(2, 0));
    }

    #[test]
    fn count_down_clamps() {
        let mut ed = editor("a\nb");
        keys(&mut ed, "9j");
        assert_eq!(ed.cursor(), p(1, 0));
    }

    #[test]
    fn bare_zero_is_line_start_but_extends_a_count() {
        let mut ed = editor(&"x\n".repeat(20));
        keys(&mut ed, "$0");
        assert_eq!(ed.cursor(), p(0, 0));
        keys(&mut ed, "10j");
        assert_eq!(ed.cursor(), p(10, 0));
    }

    #[test]
    fn delete_word() {
        let mut ed = editor("hello world");
        keys(&mut ed, "dw");
        assert_eq!(ed.buffer().line(0), "world");
        assert_eq!(ed.cursor(), p(0, 0));
        assert_eq!(ed.register().content(), "hello ");
    }

    #[test]
    fn count_dd_removes_that_many_lines() {
        let mut ed = editor("1\n2\n3\n4\n5");
        keys(&mut ed, "2dd");
        assert_eq!(ed.buffer().lines(), ["3", "4", "5"]);
        assert_eq!(ed.register().kind(), RegisterKind::Line);
    }

    #[test]
    fn count_dd_on_last_line_leaves_lines_above() {
        let mut ed = editor("1\n2\n3\n4\n5");
        keys(&mut ed, "G2dd");
        assert_eq!(ed.buffer().lines(), ["1", "2", "3", "4"]);
        assert_eq!(ed.cursor(), Position::new(3, 0));
        assert_eq!(ed.register().content(), "5");
    }

    #[test]
    fn count_dd_runs_off_the_end() {
        let mut ed = editor("1\n2\n3\n4\n5");
        keys(&mut ed, "G3dd");
        assert_eq!(ed.buffer().lines(), ["1", "2", "3", "4"]);

        let mut ed = editor("1\n2\n3\n4\n5");
        keys(&mut ed, "Gk3dd");
        assert_eq!(ed.buffer().lines(), ["1", "2", "3"]);
        assert_eq!(ed.register().content(), "4\n5");
    }

    #[test]
    fn count_cc_runs_off_the_end() {
        let mut ed = editor("1\n2\n3\n4\n5");
        keys(&mut ed, "Gk3ccX");
        assert_eq!(ed.buffer().lines(), ["1", "2", "3", "X"]);
        assert_eq!(ed.mode(), Mode::Insert);
    }

    #[test]
    fn motion_count_after_operator() {
        let mut ed = editor("a b c d");
        keys(&mut ed, "d2w");
        assert_eq!(ed.buffer().line(0), "c d");
    }

    #[test]
    fn gg_and_g_motions() {
        let mut ed = editor("1\n2\n3\n4");
        keys(&mut ed, "G");
        assert_eq!(ed.cursor().line, 3);
        keys(&mut ed, "gg");
        assert_eq!(ed.cursor().line, 0);
        keys(&mut ed, "3G");
        assert_eq!(ed.cursor().line, 2);
    }

    #[test]
    fn case_operators_with_prefix() {
        let mut ed = editor("abc def");
        keys(&mut ed, "gUw");
        assert_eq!(ed.buffer().line(0), "ABC def");
        keys(&mut ed, "g~~");
        assert_eq!(ed.buffer().line(0), "abc DEF");
        keys(&mut ed, "guu");
        assert_eq!(ed.buffer().line(0), "abc def");
    }

    #[test]
    fn indent_line_twice() {
        let mut ed = editor("x");
        keys(&mut ed, ">>");
        assert_eq!(ed.buffer().line(0), "  x");
        keys(&mut ed, "<<");
        assert_eq!(ed.buffer().line(0), "x");
    }

    #[test]
    fn shift_width_is_configurable() {
        let mut ed = editor("x").with_shift_width(4);
        keys(&mut ed, ">>");
        assert_eq!(ed.buffer().line(0), "    x");
    }

    #[test]
    fn change_word_enters_insert() {
        let mut ed = editor("hello world");
        keys(&mut ed, "cwbye \x1b");
        assert_eq!(ed.buffer().line(0), "bye world");
        assert_eq!(ed.mode(), Mode::Normal);
    }

    #[test]
    fn yank_does_not_record_change() {
        let mut ed = editor("abc");
        keys(&mut ed, "yy");
        assert_eq!(ed.last_change(), None);
        assert!(!ed.buffer().is_dirty());
        keys(&mut ed, "p");
        assert_eq!(ed.buffer().lines(), ["abc", "abc"]);
        assert_eq!(ed.cursor(), p(1, 0));
    }

    #[test]
    fn dead_sequence_resets_silently() {
        let mut ed = editor("abc");
        keys(&mut ed, "dq");
        assert!(!ed.is_composing());
        assert_eq!(ed.buffer().line(0), "abc");
        keys(&mut ed, "gq");
        assert!(!ed.is_composing());
    }

    #[test]
    fn escape_cancels_pending_operator() {
        let mut ed = editor("abc");
        keys(&mut ed, "3d\x1bx");
        assert_eq!(ed.buffer().line(0), "bc");
    }

    #[test]
    fn arrow_cancels_pending_operator() {
        let mut ed = editor("abc\ndef");
        keys(&mut ed, "d");
        assert!(ed.is_composing());
        ed.on_key(KeyEvent::plain(KeyCode::Down));
        assert!(!ed.is_composing());
        assert_eq!(ed.cursor(), p(1, 0));
        keys(&mut ed, "w");
        assert_eq!(ed.buffer().lines(), ["abc", "def"]);
    }

    #[test]
    fn x_deletes_under_cursor_with_count() {
        let mut ed = editor("abcdef");
        keys(&mut ed, "l2x");
        assert_eq!(ed.buffer().line(0), "adef");
        assert_eq!(ed.register().content(), "bc");
    }

    #[test]
    fn dot_repeats_last_change() {
        let mut ed = editor("1\n2\n3\n4\n5");
        keys(&mut ed, "dd.");
        assert_eq!(ed.buffer().lines(), ["3", "4", "5"]);
        keys(&mut ed, "2.");
        assert_eq!(ed.buffer().lines(), ["5"]);
    }

    #[test]
    fn dot_repeats_x() {
        let mut ed = editor("abcdef");
        keys(&mut ed, "x.");
        assert_eq!(ed.buffer().line(0), "cdef");
        assert_eq!(
            ed.last_change().map(|c| (c.operator, c.motion)),
            Some((Operator::Delete, Motion::Right))
        );
    }

    #[test]
    fn insert_variants() {
        let mut ed = editor("bc");
        keys(&mut ed, "Ia\x1bAd\x1b");
        assert_eq!(ed.buffer().line(0), "abcd");
        keys(&mut ed, "0a-\x1b");
        assert_eq!(ed.buffer().line(0), "a-bcd");
    }

    #[test]
    fn open_line_below_and_above() {
        let mut ed = editor("mid");
        keys(&mut ed, "obelow\x1bggOabove\x1b");
        assert_eq!(ed.buffer().lines(), ["above", "mid", "below"]);
    }

    #[test]
    fn insert_enter_and_backspace() {
        let mut ed = editor("ab");
        keys(&mut ed, "a\r");
        assert_eq!(ed.buffer().lines(), ["a", "b"]);
        assert_eq!(ed.cursor(), p(1, 0));
        keys(&mut ed, "\x7f");
        assert_eq!(ed.buffer().lines(), ["ab"]);
        assert_eq!(ed.cursor(), p(0, 1));
    }

    #[test]
    fn visual_line_delete() {
        let mut ed = editor("0\n1\n2\n3\n4");
        keys(&mut ed, "jVjjd");
        assert_eq!(ed.buffer().lines(), ["0", "4"]);
        assert_eq!(ed.mode(), Mode::Normal);
    }

    #[test]
    fn visual_char_uppercase() {
        let mut ed = editor("abcdef");
        keys(&mut ed, "llvllU");
        assert_eq!(ed.buffer().line(0), "abCDEf");
        assert_eq!(ed.mode(), Mode::Normal);
    }

    #[test]
    fn visual_yank_returns_to_normal() {
        let mut ed = editor("abc");
        keys(&mut ed, "vly");
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.register().content(), "ab");
        assert!(!ed.buffer().is_dirty());
    }

    #[test]
    fn visual_keys_toggle_and_switch() {
        let mut ed = editor("abc");
        keys(&mut ed, "v");
        assert_eq!(ed.mode(), Mode::Visual(VisualKind::Char));
        keys(&mut ed, "V");
        assert_eq!(ed.mode(), Mode::Visual(VisualKind::Line));
        keys(&mut ed, "V");
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.selection(), None);
    }

    #[test]
    fn visual_change_returns_to_normal() {
        let mut ed = editor("abc");
        keys(&mut ed, "vlc");
        assert_eq!(ed.buffer().line(0), "c");
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.register().content(), "ab");
    }

    #[test]
    fn cmdline_write_calls_hook() {
        let saved = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&saved);
        let spec = BufferSpec::new("f", "a").on_save(move |t| sink.borrow_mut().push(t.to_owned()));
        let mut ed = Editor::new(vec![spec], SIZE);
        keys(&mut ed, "x:w\r");
        assert_eq!(*saved.borrow(), [""]);
        assert_eq!(ed.mode(), Mode::Normal);
        assert!(!ed.buffer().is_dirty());
    }

    #[test]
    fn quit_variants() {
        let mut ed = editor("a");
        assert_eq!(keys(&mut ed, ":q\r"), EditorEvent::Exit { saved: false });
        let mut ed = editor("a");
        assert_eq!(keys(&mut ed, ":wq\r"), EditorEvent::Exit { saved: true });
        let mut ed = editor("a");
        assert_eq!(keys(&mut ed, ":x\r"), EditorEvent::Exit { saved: true });
    }

    #[test]
    fn unknown_command_returns_to_normal() {
        let mut ed = editor("a");
        assert_eq!(keys(&mut ed, ":nope\r"), EditorEvent::Continue);
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.cmdline(), "");
    }

    #[test]
    fn cmdline_escape_and_backspace() {
        let mut ed = editor("a");
        keys(&mut ed, ":qq\x7f");
        assert_eq!(ed.cmdline(), "q");
        keys(&mut ed, "\x1b");
        assert_eq!(ed.mode(), Mode::Normal);
        assert_eq!(ed.cmdline(), "");
    }

    #[test]
    fn tab_switches_buffers() {
        let specs = vec![BufferSpec::new("a", "aaa"), BufferSpec::new("b", "b")];
        let mut ed = Editor::new(specs, SIZE);
        keys(&mut ed, "ll");
        ed.on_key(KeyEvent::plain(KeyCode::Tab));
        assert_eq!(ed.buffer().filename(), "b");
        assert_eq!(ed.cursor(), p(0, 0));
        ed.on_key(KeyEvent {
            code: KeyCode::Tab,
            modifiers: Modifiers::SHIFT,
        });
        assert_eq!(ed.buffer().filename(), "a");
        assert_eq!(ed.cursor(), p(0, 2));
    }

    #[test]
    fn half_page_scroll_clamps_cursor() {
        let text: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut ed = editor(&text.join("\n"));
        ed.on_key(KeyEvent::ctrl('d'));
        assert_eq!(ed.cursor().line, 5);
        assert_eq!(ed.viewport().top, 5);
        ed.on_key(KeyEvent::ctrl('u'));
        assert_eq!(ed.cursor().line, 0);
        assert_eq!(ed.viewport().top, 0);
    }

    #[test]
    fn save_reload_round_trip() {
        let saved = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&saved);
        let spec = BufferSpec::new("f", "one\ntwo").on_save(move |t| *sink.borrow_mut() = t.to_owned());
        let mut ed = Editor::new(vec![spec], SIZE);
        keys(&mut ed, "A!\x1b:w\r");
        let reloaded = EditorBuffer::new("f", &saved.borrow());
        assert_eq!(reloaded.lines(), ed.buffer().lines());
        assert!(!ed.buffer().is_dirty());
        keys(&mut ed, "x");
        assert!(ed.buffer().is_dirty());
    }

    #[test]
    fn screen_shows_mode_and_position() {
        let mut ed = editor("abc");
        keys(&mut ed, "li");
        let screen = ed.screen();
        assert!(screen.starts_with("\x1b[2J\x1b[H"));
        assert!(screen.contains("insert"));
        assert!(screen.contains("t.txt  1,2"));
    }
}
