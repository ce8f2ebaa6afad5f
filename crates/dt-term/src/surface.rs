// SPDX-License-Identifier: MIT
//
// Terminal surface: the write side of the terminal as the shell sees it.
//
// The shell and the editor never touch stdout directly. They write text to
// a `Surface`, which is either the real terminal (`StdoutSurface`, batched
// through an `OutputBuffer` and flushed once per input batch) or an
// in-memory capture (`MemorySurface`) used by tests and headless runs.

use std::io;

use crate::ansi;
use crate::output::OutputBuffer;
use crate::terminal::Size;

// ─── Surface ─────────────────────────────────────────────────────────────────

/// Primitive output operations of a character terminal.
pub trait Surface {
    /// Write text verbatim. Control sequences pass through untouched.
    fn write(&mut self, text: &str);

    /// Write text followed by a CR LF pair.
    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\r\n");
    }

    /// Clear the whole screen and home the cursor.
    fn clear(&mut self);

    /// Current size in character cells.
    fn size(&self) -> Size;
}

// ─── MemorySurface ───────────────────────────────────────────────────────────

/// A surface that records everything written to it.
///
/// `clear()` drops the captured text (as a real screen would lose it) and
/// bumps a counter, so tests can assert on both.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    out: String,
    size: Size,
    clears: usize,
}

impl MemorySurface {
    /// An empty 80×24 surface.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_size(Size { cols: 80, rows: 24 })
    }

    /// An empty surface of the given size.
    #[must_use]
    pub const fn with_size(size: Size) -> Self {
        Self {
            out: String::new(),
            size,
            clears: 0,
        }
    }

    /// Everything written since creation or the last clear/take.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.out
    }

    /// Take the captured output, leaving the surface empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// How many times `clear()` has been called.
    #[must_use]
    pub const fn clear_count(&self) -> usize {
        self.clears
    }

    /// Change the reported size.
    pub const fn resize(&mut self, size: Size) {
        self.size = size;
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn clear(&mut self) {
        self.out.clear();
        self.clears += 1;
    }

    fn size(&self) -> Size {
        self.size
    }
}

// ─── StdoutSurface ───────────────────────────────────────────────────────────

/// The real terminal, batched.
///
/// Writes accumulate in an [`OutputBuffer`]; the event loop calls
/// [`flush`](Self::flush) once per input batch or tick.
pub struct StdoutSurface {
    buf: OutputBuffer,
    size: Size,
}

impl StdoutSurface {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            buf: OutputBuffer::new(),
            size,
        }
    }

    pub const fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Send everything written so far to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.buf.flush_stdout()
    }
}

impl Surface for StdoutSurface {
    fn write(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn clear(&mut self) {
        self.buf.push_str(ansi::CLEAR_AND_HOME);
    }

    fn size(&self) -> Size {
        self.size
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writeln_appends_crlf() {
        let mut s = MemorySurface::new();
        s.write("> ");
        s.writeln("hello");
        assert_eq!(s.output(), "> hello\r\n");
    }

    #[test]
    fn clear_drops_output_and_counts() {
        let mut s = MemorySurface::new();
        s.write("junk");
        s.clear();
        s.write("fresh");
        assert_eq!(s.output(), "fresh");
        assert_eq!(s.clear_count(), 1);
    }

    #[test]
    fn take_empties() {
        let mut s = MemorySurface::new();
        s.write("abc");
        assert_eq!(s.take(), "abc");
        assert_eq!(s.output(), "");
    }

    #[test]
    fn stdout_surface_buffers_until_flush() {
        let mut s = StdoutSurface::new(Size { cols: 10, rows: 5 });
        s.write("x");
        s.clear();
        assert_eq!(s.buf.as_bytes(), b"x\x1b[2J\x1b[H");
        assert_eq!(s.size(), Size { cols: 10, rows: 5 });
    }
}
