// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// The shell and the editor only need a handful of terminal commands: clear
// and home, reverse video, erase-in-line, and absolute cursor positioning.
// Frames are assembled into a `String`, so most of them are `&str` constants
// plus the `CursorTo` formatter. `Terminal` talks to the tty directly and
// uses the `impl Write` functions at the bottom.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).

use std::fmt;
use std::io::{self, Write};

// ─── Sequences ───────────────────────────────────────────────────────────────

/// Clear the screen and home the cursor. The editor starts every frame with it.
pub const CLEAR_AND_HOME: &str = "\x1b[2J\x1b[H";

/// Reset all SGR attributes (SGR 0).
pub const RESET: &str = "\x1b[0m";

/// Reverse video on (SGR 7).
pub const INVERSE: &str = "\x1b[7m";

/// Reverse video off (SGR 27), leaving other attributes alone.
pub const INVERSE_OFF: &str = "\x1b[27m";

/// Erase from the cursor to the end of the line (EL 0).
pub const ERASE_TO_EOL: &str = "\x1b[K";

/// Erase the entire current line (EL 2).
pub const ERASE_LINE: &str = "\x1b[2K";

/// Audible bell.
pub const BELL: &str = "\x07";

/// Move one cell left, overwrite with a space, move left again.
pub const RUBOUT: &str = "\x08 \x08";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Formats a CUP sequence. Use with `write!`/`format!` when building frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorTo {
    /// 0-indexed column.
    pub x: usize,
    /// 0-indexed row.
    pub y: usize,
}

impl fmt::Display for CursorTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b[{};{}H", self.y + 1, self.x + 1)
    }
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the screen and move the cursor home.
#[inline]
pub fn clear_and_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CLEAR_AND_HOME.as_bytes())
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET.as_bytes())
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Switch to the alternate screen buffer (DEC private mode 1049).
///
/// The shell session lives entirely on the alternate screen, so quitting
/// restores whatever the user had in their terminal before.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen buffer.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_to_is_one_based() {
        assert_eq!(CursorTo { x: 0, y: 0 }.to_string(), "\x1b[1;1H");
        assert_eq!(CursorTo { x: 6, y: 2 }.to_string(), "\x1b[3;7H");
    }

    #[test]
    fn cursor_show_sequence() {
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    #[test]
    fn clear_and_home_matches_constant() {
        assert_eq!(emit(|w| clear_and_home(w)), CLEAR_AND_HOME);
        assert_eq!(CLEAR_AND_HOME, "\x1b[2J\x1b[H");
    }

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    #[test]
    fn alt_screen_pair() {
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }
}
