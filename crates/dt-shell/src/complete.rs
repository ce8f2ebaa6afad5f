//! Tab completion.
//!
//! The first word completes against command names. Later words complete
//! against file system entries, but only for commands that take paths or
//! for tokens that already look like a path (contain `/` or start with
//! `~`). Directory candidates end in `/`.
//!
//! One match replaces the token. Several matches extend the token to their
//! longest common prefix; if that adds nothing, the matches are listed.

use crate::fs::{HOME, VirtualFs};

/// Commands whose arguments are paths.
pub const FILE_COMMANDS: &[&str] = &["ls", "cd", "cat", "rm", "vim", "xdg-open", "touch", "mkdir"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The whole new input line.
    Replace(String),
    /// Ambiguous: show these candidates, keep the line.
    List(Vec<String>),
    /// Nothing to complete.
    Bell,
}

/// Complete the last token of `line`.
#[must_use]
pub fn complete(line: &str, commands: &[&str], fs: &VirtualFs) -> Completion {
    let split = line
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or(0, |(idx, ch)| idx + ch.len_utf8());
    let (head, token) = line.split_at(split);

    if head.trim().is_empty() {
        let names: Vec<String> = commands
            .iter()
            .filter(|name| name.starts_with(token))
            .map(|&name| name.to_owned())
            .collect();
        return resolve(head, "", token, names);
    }

    let command = head.split_whitespace().next().unwrap_or_default();
    let path_like = token.contains('/') || token.starts_with(HOME);
    if !FILE_COMMANDS.contains(&command) && !path_like {
        return Completion::Bell;
    }
    if token == HOME {
        return Completion::Replace(format!("{head}{HOME}/"));
    }

    let (dir, base) = token
        .rfind('/')
        .map_or(("", token), |idx| token.split_at(idx + 1));
    let Some(children) = fs.lookup(dir).and_then(|node| node.children()) else {
        return Completion::Bell;
    };

    let show_hidden = base.starts_with('.');
    let candidates: Vec<String> = children
        .iter()
        .filter(|(name, node)| {
            name.starts_with(base) && (show_hidden || !(node.is_hidden() || name.starts_with('.')))
        })
        .map(|(name, node)| {
            if node.is_dir() {
                format!("{name}/")
            } else {
                name.clone()
            }
        })
        .collect();
    resolve(head, dir, base, candidates)
}

/// Turn a candidate list into a completion for `head + dir + base`.
fn resolve(head: &str, dir: &str, base: &str, mut candidates: Vec<String>) -> Completion {
    match candidates.len() {
        0 => Completion::Bell,
        1 => Completion::Replace(format!("{head}{dir}{}", candidates[0])),
        _ => {
            candidates.sort_unstable();
            let prefix = common_prefix(&candidates);
            if prefix.len() > base.len() {
                Completion::Replace(format!("{head}{dir}{prefix}"))
            } else {
                Completion::List(candidates)
            }
        }
    }
}

/// Longest common prefix, on char boundaries.
fn common_prefix(words: &[String]) -> &str {
    let Some((first, rest)) = words.split_first() else {
        return "";
    };
    let mut end = first.len();
    for word in rest {
        end = first
            .char_indices()
            .zip(word.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((idx, ch), _)| idx + ch.len_utf8())
            .min(end);
    }
    &first[..end]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
