//! Command-line mode: the `:` prompt on the status line.
//!
//! Pressing `:` in normal mode starts an empty command line. Printable keys
//! append to it, Backspace removes the last character, Escape abandons it
//! and Enter parses it into a [`Command`].
//!
//! # Supported commands
//!
//! | Command          | Action                           |
//! |------------------|----------------------------------|
//! | `:w`, `:write`   | Save the active buffer           |
//! | `:q`, `:quit`    | Leave the editor without saving  |
//! | `:wq`, `:x`      | Save, then leave                 |
//!
//! Only these exact tokens are recognized. Anything else is
//! [`Command::Unknown`] and the editor ignores it. There is no "unsaved
//! changes" guard on `:q`.

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed command-line command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:w` / `:write`
    Write,
    /// `:q` / `:quit`
    Quit,
    /// `:wq` / `:x`
    WriteQuit,
    /// Anything else, trimmed. Empty input lands here too.
    Unknown(String),
}

impl Command {
    /// Parse the trimmed command text. Case-sensitive, no abbreviations.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "w" | "write" => Self::Write,
            "q" | "quit" => Self::Quit,
            "wq" | "x" => Self::WriteQuit,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The text typed after `:`.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    input: String,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Remove the last character. Returns `false` if there was none.
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Parse the buffer and empty it.
    pub fn take(&mut self) -> Command {
        let cmd = Command::parse(&self.input);
        self.input.clear();
        cmd
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
