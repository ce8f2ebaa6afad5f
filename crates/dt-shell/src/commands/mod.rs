//! Command dispatch table.
//!
//! A command line is trimmed and split on whitespace. The first word picks a
//! [`Handler`] from the [`CommandTable`]; the rest are its arguments. While
//! duck mode is on, the quack overlay in [`duck`] answers first for the
//! commands it covers.
//!
//! Handlers never print. They return an [`Outcome`] and the shell turns it
//! into terminal output.

pub mod duck;
pub mod files;
pub mod system;

use std::collections::BTreeMap;
use std::fmt;

use dt_editor::BufferSpec;

use crate::session::Session;

/// Deferred work of a confirmed command. Runs at most once, on "yes".
pub type Perform = Box<dyn FnOnce(&mut Session) -> String>;

/// A command implementation.
pub type Handler = fn(&mut Session, &[&str]) -> Outcome;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a command asks the shell to do.
pub enum Outcome {
    /// Print these lines. Empty text prints nothing.
    Text(String),
    /// Clear the terminal.
    Clear,
    /// Ask a yes/no question before running `perform`.
    Confirm { message: String, perform: Perform },
    /// Hand the terminal to the editor with these buffers.
    Edit(Vec<BufferSpec>),
    /// Leave the program.
    Exit,
}

impl Outcome {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Clear => f.write_str("Clear"),
            Self::Confirm { message, .. } => f
                .debug_struct("Confirm")
                .field("message", message)
                .finish_non_exhaustive(),
            Self::Edit(specs) => f.debug_tuple("Edit").field(&specs.len()).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

// ---------------------------------------------------------------------------
// CommandTable
// ---------------------------------------------------------------------------

pub struct CommandTable {
    handlers: BTreeMap<&'static str, Handler>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandTable {
    /// A table with no commands.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Every built-in command.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::empty();
        system::register(&mut table);
        files::register(&mut table);
        duck::register(&mut table);
        table
    }

    pub fn insert(&mut self, name: &'static str, handler: Handler) {
        self.handlers.insert(name, handler);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }

    /// Command names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// Run one command line. Returns `None` for a blank line.
    pub fn dispatch(&self, session: &mut Session, line: &str) -> Option<Outcome> {
        let mut words = line.split_whitespace();
        let name = words.next()?;
        let args: Vec<&str> = words.collect();
        tracing::debug!(name, args = args.len(), "dispatch");

        if session.duck.is_active() {
            if let Some(text) = duck::overlay(name, &args) {
                return Some(Outcome::Text(text));
            }
        }

        Some(match self.get(name) {
            Some(handler) => handler(session, &args),
            None => Outcome::Text(format!("Command \"{name}\" not found")),
        })
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
