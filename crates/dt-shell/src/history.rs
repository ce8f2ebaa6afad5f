//! Command history with Up/Down recall.
//!
//! `index == None` means the user is editing a fresh line. The first Up
//! stashes that line so coming back down past the newest entry restores it.

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    index: Option<usize>,
    stash: String,
}

impl CommandHistory {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            stash: String::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub const fn is_browsing(&self) -> bool {
        self.index.is_some()
    }

    /// Record a submitted line and stop browsing. Blank lines are skipped.
    pub fn push(&mut self, line: &str) {
        self.reset();
        let line = line.trim();
        if !line.is_empty() {
            self.entries.push(line.to_owned());
        }
    }

    /// Stop browsing without touching the entries.
    pub fn reset(&mut self) {
        self.index = None;
        self.stash.clear();
    }

    /// Step to an older entry. `current` is the line being edited, stashed
    /// on the first step. Returns the line to show, or `None` with no
    /// history.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.index {
            None => {
                current.clone_into(&mut self.stash);
                self.entries.len() - 1
            }
            Some(idx) => idx.saturating_sub(1),
        };
        self.index = Some(idx);
        Some(&self.entries[idx])
    }

    /// Step to a newer entry, or back to the stashed line past the newest.
    /// Returns `None` when not browsing.
    pub fn newer(&mut self) -> Option<String> {
        let idx = self.index?;
        if idx + 1 < self.entries.len() {
            self.index = Some(idx + 1);
            return Some(self.entries[idx + 1].clone());
        }
        self.index = None;
        Some(std::mem::take(&mut self.stash))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
