//! Key-sequence trie with an external walk cursor.
//!
//! NORMAL mode resolves multi-key commands (`gg`, `g~`, `gU`) by walking a
//! trie one keystroke at a time. The trie itself is immutable after setup;
//! the walk position is a small `Copy` cursor the caller keeps between keys,
//! so several tries can be walked in parallel and the whole pending state
//! can be reset by dropping the cursors.
//!
//! Nodes live in an arena (`Vec`) and refer to their children by index.

// ---------------------------------------------------------------------------
// KeyTrie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Node<T> {
    children: Vec<(char, usize)>,
    value: Option<T>,
}

impl<T> Node<T> {
    const fn empty() -> Self {
        Self {
            children: Vec::new(),
            value: None,
        }
    }
}

/// A trie mapping key sequences to values.
#[derive(Debug, Clone)]
pub struct KeyTrie<T> {
    nodes: Vec<Node<T>>,
}

/// A position inside a [`KeyTrie`]. [`TrieCursor::ROOT`] is the empty prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieCursor(usize);

impl TrieCursor {
    pub const ROOT: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

/// What happened when a key was fed to the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// No entry continues with this key.
    Dead,
    /// A valid prefix; keep walking from the cursor.
    Partial(TrieCursor),
    /// The key completes an entry.
    ///
    /// `more` is true if longer entries also start with this sequence.
    Accept {
        value: T,
        cursor: TrieCursor,
        more: bool,
    },
}

impl<T: Copy> KeyTrie<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::empty()],
        }
    }

    /// Build a trie from `(keys, value)` pairs.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, T)>) -> Self {
        let mut trie = Self::new();
        for (keys, value) in entries {
            trie.insert(keys, value);
        }
        trie
    }

    /// Map `keys` to `value`, replacing any previous value.
    pub fn insert(&mut self, keys: &str, value: T) {
        let mut node = 0;
        for key in keys.chars() {
            node = match self.child(node, key) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::empty());
                    self.nodes[node].children.push((key, next));
                    next
                }
            };
        }
        self.nodes[node].value = Some(value);
    }

    /// Advance `cursor` by one key.
    #[must_use]
    pub fn step(&self, cursor: TrieCursor, key: char) -> Step<T> {
        let Some(next) = self.child(cursor.0, key) else {
            return Step::Dead;
        };
        let node = &self.nodes[next];
        match node.value {
            Some(value) => Step::Accept {
                value,
                cursor: TrieCursor(next),
                more: !node.children.is_empty(),
            },
            None => Step::Partial(TrieCursor(next)),
        }
    }

    /// Look up a complete sequence from the root.
    #[must_use]
    pub fn get(&self, keys: &str) -> Option<T> {
        let mut node = 0;
        for key in keys.chars() {
            node = self.child(node, key)?;
        }
        self.nodes[node].value
    }

    fn child(&self, node: usize, key: char) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .find_map(|&(k, idx)| (k == key).then_some(idx))
    }
}

impl<T: Copy> Default for KeyTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn trie() -> KeyTrie<u8> {
        KeyTrie::from_entries([("d", 1), ("gu", 2), ("gU", 3), ("gg", 4)])
    }

    #[test]
    fn single_key_accepts() {
        assert!(matches!(
            trie().step(TrieCursor::ROOT, 'd'),
            Step::Accept { value: 1, more: false, .. }
        ));
    }

    #[test]
    fn prefix_is_partial_then_accepts() {
        let t = trie();
        let Step::Partial(c) = t.step(TrieCursor::ROOT, 'g') else {
            panic!("g should be a prefix");
        };
        assert!(!c.is_root());
        assert!(matches!(t.step(c, 'U'), Step::Accept { value: 3, .. }));
        assert!(matches!(t.step(c, 'g'), Step::Accept { value: 4, .. }));
        assert_eq!(t.step(c, 'x'), Step::Dead);
    }

    #[test]
    fn unknown_key_is_dead() {
        assert_eq!(trie().step(TrieCursor::ROOT, 'z'), Step::Dead);
    }

    #[test]
    fn accept_reports_longer_entries() {
        let mut t = trie();
        t.insert("dd", 9);
        assert!(matches!(
            t.step(TrieCursor::ROOT, 'd'),
            Step::Accept { value: 1, more: true, .. }
        ));
    }

    #[test]
    fn get_full_sequences() {
        let t = trie();
        assert_eq!(t.get("gu"), Some(2));
        assert_eq!(t.get("g"), None);
        assert_eq!(t.get("q"), None);
    }

    #[test]
    fn insert_replaces_value() {
        let mut t = trie();
        t.insert("d", 7);
        assert_eq!(t.get("d"), Some(7));
    }
}
