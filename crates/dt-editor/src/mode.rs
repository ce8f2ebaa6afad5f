//! Vim-style modal editing.
//!
//! The editor is always in exactly one [`Mode`]. Each mode changes how a key
//! is interpreted:
//!
//! | Mode      | Keys mean                                  | Left by            |
//! |-----------|--------------------------------------------|--------------------|
//! | Normal    | counts, operators, motions, commands       | `i a o v :` ...    |
//! | Insert    | text                                       | Escape             |
//! | Visual    | motions extend the selection, operators act | Escape, `v`/`V`   |
//! | `CmdLine` | text for the `:` command                    | Enter, Escape      |

use std::fmt;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`: character-wise selection.
    Char,
    /// `V`: line-wise selection (always whole lines).
    Line,
}

impl VisualKind {
    /// The key that enters (and leaves) this kind of selection.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Char => 'v',
            Self::Line => 'V',
        }
    }

    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'v' => Some(Self::Char),
            'V' => Some(Self::Line),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// Pure data: key dispatch and transitions live in the editor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual(VisualKind),
    /// Typing a `:` command on the status line.
    CmdLine,
}

impl Mode {
    /// Name shown on the left of the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Insert => "insert",
            Self::Visual(VisualKind::Char) => "visual",
            Self::Visual(VisualKind::Line) => "visual line",
            Self::CmdLine => "cmdline",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn display_names_are_lowercase() {
        assert_eq!(Mode::Normal.to_string(), "normal");
        assert_eq!(Mode::Insert.to_string(), "insert");
        assert_eq!(Mode::Visual(VisualKind::Line).to_string(), "visual line");
        assert_eq!(Mode::CmdLine.to_string(), "cmdline");
    }

    #[test]
    fn visual_keys_round_trip() {
        for kind in [VisualKind::Char, VisualKind::Line] {
            assert_eq!(VisualKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(VisualKind::from_key('x'), None);
    }

    #[test]
    fn is_visual() {
        assert!(Mode::Visual(VisualKind::Char).is_visual());
        assert!(!Mode::Insert.is_visual());
    }
}
