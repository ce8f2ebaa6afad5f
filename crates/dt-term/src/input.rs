// SPDX-License-Identifier: MIT
//
// Key event router: raw terminal bytes in, classified key events out.
//
// Everything the shell and the editor react to passes through here:
//
// - Arrow keys, in both CSI (`ESC [ A`) and SS3 (`ESC O A`) encodings,
//   with xterm modifier parameters (`ESC [ 1 ; 5 A` is Ctrl+Up)
// - Home / End / Delete and back-tab (`ESC [ Z`)
// - Control codes: Ctrl-D (0x04) and Ctrl-U (0x15) scroll the editor,
//   Ctrl-C abandons a shell line, BS (0x08) and DEL (0x7F) are Backspace,
//   CR and LF are Enter
// - Alt+key (ESC followed by a printable byte)
// - Printable ASCII and UTF-8 multi-byte characters
//
// # Design
//
// Escape sequences can span multiple `read()` calls, so the parser keeps a
// small pending buffer between calls to [`Parser::advance`]. The buffer is
// bounded: a sequence that grows past [`MAX_SEQUENCE_LEN`] bytes without a
// final byte is discarded rather than waited on forever. After a timeout
// with no new bytes, [`Parser::flush`] resolves a lone ESC into a real
// Escape keypress.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// Longest escape sequence we are willing to accumulate.
///
/// Every sequence the router understands fits in 7 bytes
/// (`ESC [ 1 ; 5 A` is 6). Anything longer is noise.
pub const MAX_SEQUENCE_LEN: usize = 8;

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl).
    pub modifiers: Modifiers,
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character. Control codes arrive as `Char` + CTRL.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding where `param = 1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

impl KeyEvent {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A printable character with no modifiers.
    #[inline]
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    /// Ctrl + `ch`.
    #[inline]
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// True if this is Ctrl + `ch`.
    #[inline]
    #[must_use]
    pub fn is_ctrl(self, ch: char) -> bool {
        self.code == KeyCode::Char(ch) && self.modifiers.contains(Modifiers::CTRL)
    }

    /// The character this key types, if it types one.
    ///
    /// Control and Alt chords type nothing; neither do named keys.
    #[must_use]
    pub fn printable(self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch)
                if !self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT)
                    && !ch.is_control() =>
            {
                Some(ch)
            }
            _ => None,
        }
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`KeyEvent`]s. Incomplete sequences stay buffered until more bytes arrive
/// or [`flush`](Parser::flush) is called.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte could be the Escape key or the start of a sequence.
/// The parser holds it as pending; the event loop calls `flush` after a
/// short timeout to turn it into an Escape keypress.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(MAX_SEQUENCE_LEN),
        }
    }

    /// Feed raw bytes from stdin and return all events that can be parsed.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => {
                    let pending = self.buf.len() - pos;
                    if pending < MAX_SEQUENCE_LEN {
                        break;
                    }
                    tracing::warn!(pending, "discarding overlong escape sequence");
                    pos = self.buf.len();
                }
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes after an input timeout.
    ///
    /// A pending sequence that begins with ESC becomes one Escape keypress;
    /// the rest of an unfinished sequence (`ESC [` with no final byte) is
    /// dropped. A truncated UTF-8 character is dropped too.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let events = if self.buf.first() == Some(&0x1B) {
            vec![KeyEvent::plain(KeyCode::Escape)]
        } else {
            Vec::new()
        };
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a complete chunk, resolving anything left pending at the end.
///
/// Convenience for tests and for feeding whole strings (pasted text,
/// scripted input) through the same classification as live keystrokes.
#[must_use]
pub fn parse_all(data: &[u8]) -> Vec<KeyEvent> {
    let mut parser = Parser::new();
    let mut events = parser.advance(data);
    events.extend(parser.flush());
    events
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one key from the front of the buffer.
enum Parsed {
    /// Parsed a key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Sequence is incomplete; need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

/// Try to parse a single key from the start of `buf`.
fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        b @ 0x01..=0x1A => Parsed::Key(KeyEvent::ctrl(char::from(b + b'a' - 1)), 1),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::char(char::from(b)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        // NUL, FS..US, and stray continuation bytes carry nothing we use.
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent {
                code: KeyCode::Char(char::from(b)),
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        // ESC ESC, or ESC before a control byte: the first ESC stands alone.
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    // Scan for the final byte (0x40..=0x7E). Parameter bytes are in
    // 0x30..=0x3F, intermediates in 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end);
        }
        end += 1;
        if end >= MAX_SEQUENCE_LEN {
            return Parsed::Skip(end);
        }
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => {
            return Parsed::Key(
                KeyEvent {
                    code: KeyCode::Tab,
                    modifiers: Modifiers::SHIFT,
                },
                consumed,
            );
        }
        b'~' => match params.first() {
            Some(1 | 7) => KeyCode::Home,
            Some(3) => KeyCode::Delete,
            Some(4 | 8) => KeyCode::End,
            _ => return Parsed::Skip(consumed),
        },
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Key(KeyEvent { code, modifiers }, consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

/// Application-cursor-mode arrows: `ESC O A` .. `ESC O D`, plus Home/End.
fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };

    Parsed::Key(KeyEvent::plain(code), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| Parsed::Key(KeyEvent::char(ch), expected))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Parse semicolon-separated decimal CSI parameters. Empty fields are 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode a CSI modifier parameter (`1 + bitmask`) into [`Modifiers`].
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
