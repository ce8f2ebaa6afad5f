//! Yes/no confirmation before a dangerous command runs.
//!
//! While a confirmation is pending every key goes here instead of the line
//! editor. Only `y`, `yes`, `n` and `no` (any case, surrounding blanks
//! ignored) end it; anything else asks again.

use std::fmt;

use crate::commands::Perform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Invalid,
}

impl Answer {
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Self::Yes,
            "n" | "no" => Self::No,
            _ => Self::Invalid,
        }
    }
}

/// A question waiting for its answer.
pub struct PendingConfirm {
    perform: Perform,
    /// Prompt to put back once answered.
    restore_prompt: String,
    answer: String,
}

impl PendingConfirm {
    #[must_use]
    pub fn new(perform: Perform, restore_prompt: String) -> Self {
        Self {
            perform,
            restore_prompt,
            answer: String::new(),
        }
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn push(&mut self, ch: char) {
        self.answer.push(ch);
    }

    /// Remove the last typed character. Returns `false` if there was none.
    pub fn backspace(&mut self) -> bool {
        self.answer.pop().is_some()
    }

    /// Parse the typed answer and clear it for a retry.
    pub fn take_answer(&mut self) -> Answer {
        let answer = Answer::parse(&self.answer);
        self.answer.clear();
        answer
    }

    /// Consume into the deferred action and the prompt to restore.
    #[must_use]
    pub fn finish(self) -> (Perform, String) {
        (self.perform, self.restore_prompt)
    }
}

impl fmt::Debug for PendingConfirm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingConfirm")
            .field("restore_prompt", &self.restore_prompt)
            .field("answer", &self.answer)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
