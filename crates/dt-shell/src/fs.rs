//! In-memory file tree behind `ls`, `cd`, `cat` and friends.
//!
//! The tree is rooted at `~` and seeded from `assets/home.json`. Paths are
//! handled as absolute segment lists whose first element is always `~`:
//!
//! ```text
//! ""  / "."      -> cwd
//! "~"            -> ["~"]
//! "~/a/b"        -> ["~", "a", "b"]
//! "a/../b"       -> cwd + ["b"]
//! ".." at "~"    -> ["~"]
//! ```
//!
//! Nothing is persisted. The tree is shared between the shell and every
//! editor save hook through [`SharedFs`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

/// Name of the root segment.
pub const HOME: &str = "~";

/// The tree as seen by the shell and by editor save hooks.
pub type SharedFs = Rc<RefCell<VirtualFs>>;

const SEED: &str = include_str!("../assets/home.json");

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File {
        #[serde(default)]
        content: String,
        #[serde(default)]
        mime: Option<String>,
        /// External location of binary documents (PDFs, images).
        #[serde(default)]
        src: Option<String>,
    },
    Directory {
        #[serde(default)]
        children: BTreeMap<String, Node>,
        /// Hidden from a plain `ls` and from completion of an empty prefix.
        #[serde(default)]
        hidden: bool,
    },
}

impl Node {
    /// An empty plain file.
    #[must_use]
    pub const fn file() -> Self {
        Self::File {
            content: String::new(),
            mime: None,
            src: None,
        }
    }

    /// An empty visible directory.
    #[must_use]
    pub const fn dir() -> Self {
        Self::Directory {
            children: BTreeMap::new(),
            hidden: false,
        }
    }

    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self, Self::Directory { hidden: true, .. })
    }

    /// File content, `None` for directories.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::File { content, .. } => Some(content),
            Self::Directory { .. } => None,
        }
    }

    #[must_use]
    pub fn mime(&self) -> Option<&str> {
        match self {
            Self::File { mime, .. } => mime.as_deref(),
            Self::Directory { .. } => None,
        }
    }

    #[must_use]
    pub fn src(&self) -> Option<&str> {
        match self {
            Self::File { src, .. } => src.as_deref(),
            Self::Directory { .. } => None,
        }
    }

    #[must_use]
    pub const fn children(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    const fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Self>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FsError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FsError {
    #[error("{0}: no such file or directory")]
    NotFound(String),
    #[error("{0}: not a directory")]
    NotADirectory(String),
    #[error("{0}: is a directory")]
    IsADirectory(String),
    #[error("{0}: already exists")]
    AlreadyExists(String),
    #[error("refusing to remove ~")]
    RemoveRoot,
    #[error("invalid seed tree: {0}")]
    Seed(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// VirtualFs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct VirtualFs {
    root: Node,
    cwd: Vec<String>,
}

impl VirtualFs {
    /// A tree with `root` as `~`, cwd at the root.
    ///
    /// A file root is replaced by an empty directory; `~` is always a
    /// directory.
    #[must_use]
    pub fn new(root: Node) -> Self {
        let root = if root.is_dir() { root } else { Node::dir() };
        Self {
            root,
            cwd: vec![HOME.to_owned()],
        }
    }

    /// The built-in home directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Seed`] if the embedded document does not parse.
    pub fn seeded() -> Result<Self, FsError> {
        Self::from_json(SEED)
    }

    /// Parse a tree from its JSON description.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Seed`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, FsError> {
        let root: Node = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    /// Wrap in the shared handle.
    #[must_use]
    pub fn shared(self) -> SharedFs {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    /// The cwd joined with `/`, e.g. `~/Documents/Notes`.
    #[must_use]
    pub fn cwd_string(&self) -> String {
        self.cwd.join("/")
    }

    // -- Paths --------------------------------------------------------------

    /// Resolve `raw` against the cwd into absolute segments.
    #[must_use]
    pub fn to_absolute(&self, raw: &str) -> Vec<String> {
        let raw = raw.trim();
        let (mut out, rest) = if raw == HOME {
            (vec![HOME.to_owned()], "")
        } else if let Some(rest) = raw.strip_prefix("~/") {
            (vec![HOME.to_owned()], rest)
        } else {
            (self.cwd.clone(), raw)
        };

        for part in rest.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if out.len() > 1 {
                        out.pop();
                    }
                }
                name => out.push(name.to_owned()),
            }
        }
        out
    }

    /// The node at an absolute path.
    #[must_use]
    pub fn resolve(&self, abs: &[String]) -> Option<&Node> {
        let (first, rest) = abs.split_first()?;
        if first != HOME {
            return None;
        }
        let mut node = &self.root;
        for part in rest {
            node = node.children()?.get(part)?;
        }
        Some(node)
    }

    fn resolve_mut(&mut self, abs: &[String]) -> Option<&mut Node> {
        let (first, rest) = abs.split_first()?;
        if first != HOME {
            return None;
        }
        let mut node = &mut self.root;
        for part in rest {
            node = node.children_mut()?.get_mut(part)?;
        }
        Some(node)
    }

    /// The node `raw` names, relative to the cwd.
    #[must_use]
    pub fn lookup(&self, raw: &str) -> Option<&Node> {
        self.resolve(&self.to_absolute(raw))
    }

    // -- Queries ------------------------------------------------------------

    /// Visible entry names of the directory at `raw`, sorted.
    ///
    /// # Errors
    ///
    /// [`FsError::NotFound`] or [`FsError::NotADirectory`].
    pub fn list(&self, raw: &str) -> Result<Vec<&str>, FsError> {
        let node = self
            .lookup(raw)
            .ok_or_else(|| FsError::NotFound(raw.to_owned()))?;
        let children = node
            .children()
            .ok_or_else(|| FsError::NotADirectory(raw.to_owned()))?;
        Ok(children
            .iter()
            .filter(|(_, child)| !child.is_hidden())
            .map(|(name, _)| name.as_str())
            .collect())
    }

    /// Content of the file at `raw`.
    ///
    /// # Errors
    ///
    /// [`FsError::NotFound`] or [`FsError::IsADirectory`].
    pub fn read_file(&self, raw: &str) -> Result<&str, FsError> {
        let node = self
            .lookup(raw)
            .ok_or_else(|| FsError::NotFound(raw.to_owned()))?;
        node.content()
            .ok_or_else(|| FsError::IsADirectory(raw.to_owned()))
    }

    // -- Mutations ----------------------------------------------------------

    /// Change directory. Returns the new cwd.
    ///
    /// # Errors
    ///
    /// [`FsError::NotFound`] or [`FsError::NotADirectory`].
    pub fn set_cwd(&mut self, raw: &str) -> Result<&[String], FsError> {
        let abs = self.to_absolute(raw);
        match self.resolve(&abs) {
            None => return Err(FsError::NotFound(raw.to_owned())),
            Some(node) if !node.is_dir() => return Err(FsError::NotADirectory(raw.to_owned())),
            Some(_) => {}
        }
        self.cwd = abs;
        Ok(&self.cwd)
    }

    /// Replace the content of the file at `abs`, creating it in an existing
    /// parent directory if needed.
    ///
    /// # Errors
    ///
    /// [`FsError::NotFound`] if the parent is missing,
    /// [`FsError::IsADirectory`] if `abs` names a directory.
    pub fn write_file(&mut self, abs: &[String], content: &str) -> Result<(), FsError> {
        let (name, parent) = abs.split_last().ok_or(FsError::RemoveRoot)?;
        let display = abs.join("/");
        if parent.is_empty() {
            return Err(FsError::IsADirectory(display));
        }
        let children = self
            .resolve_mut(parent)
            .and_then(Node::children_mut)
            .ok_or_else(|| FsError::NotFound(parent.join("/")))?;
        match children.entry(name.clone()).or_insert_with(Node::file) {
            Node::File { content: slot, .. } => {
                content.clone_into(slot);
                Ok(())
            }
            Node::Directory { .. } => Err(FsError::IsADirectory(display)),
        }
    }

    /// Create an empty file at `raw`. An existing entry is left alone and
    /// `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// [`FsError::NotFound`] if the parent directory is missing.
    pub fn create_file(&mut self, raw: &str) -> Result<bool, FsError> {
        self.create(raw, Node::file())
    }

    /// Create an empty directory at `raw`.
    ///
    /// # Errors
    ///
    /// [`FsError::AlreadyExists`] or [`FsError::NotFound`] for a missing
    /// parent.
    pub fn create_dir(&mut self, raw: &str) -> Result<(), FsError> {
        if self.create(raw, Node::dir())? {
            Ok(())
        } else {
            Err(FsError::AlreadyExists(raw.to_owned()))
        }
    }

    fn create(&mut self, raw: &str, node: Node) -> Result<bool, FsError> {
        let abs = self.to_absolute(raw);
        let Some((name, parent)) = abs.split_last().filter(|(_, p)| !p.is_empty()) else {
            return Ok(false);
        };
        let children = self
            .resolve_mut(parent)
            .and_then(Node::children_mut)
            .ok_or_else(|| FsError::NotFound(raw.to_owned()))?;
        if children.contains_key(name) {
            return Ok(false);
        }
        children.insert(name.clone(), node);
        Ok(true)
    }

    /// Remove the entry at `abs`, returning it.
    ///
    /// # Errors
    ///
    /// [`FsError::RemoveRoot`] for `~`, [`FsError::NotFound`] otherwise.
    pub fn remove(&mut self, abs: &[String]) -> Result<Node, FsError> {
        let (name, parent) = abs.split_last().ok_or(FsError::RemoveRoot)?;
        if parent.is_empty() {
            return Err(FsError::RemoveRoot);
        }
        let removed = self
            .resolve_mut(parent)
            .and_then(Node::children_mut)
            .and_then(|children| children.remove(name))
            .ok_or_else(|| FsError::NotFound(abs.join("/")))?;

        // Keep the cwd pointing at something that exists.
        if self.cwd.starts_with(abs) {
            self.cwd.truncate(parent.len());
        }
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> VirtualFs {
        VirtualFs::seeded().unwrap()
    }

    fn abs(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&p| p.to_owned()).collect()
    }

    #[test]
    fn seed_parses_and_starts_at_home() {
        let fs = seeded();
        assert_eq!(fs.cwd_string(), "~");
        assert!(fs.lookup("Documents").is_some_and(Node::is_dir));
        assert!(fs.lookup("kernel").is_some());
        assert!(fs.lookup("system32").is_some());
    }

    #[test]
    fn absolute_path_rules() {
        let mut fs = seeded();
        fs.set_cwd("Documents/Notes").unwrap();
        assert_eq!(fs.to_absolute(""), abs(&["~", "Documents", "Notes"]));
        assert_eq!(fs.to_absolute("."), abs(&["~", "Documents", "Notes"]));
        assert_eq!(fs.to_absolute("~"), abs(&["~"]));
        assert_eq!(fs.to_absolute("~/etc/motd"), abs(&["~", "etc", "motd"]));
        assert_eq!(fs.to_absolute("../readme.txt"), abs(&["~", "Documents", "readme.txt"]));
        assert_eq!(fs.to_absolute("../../../../x"), abs(&["~", "x"]));
        assert_eq!(fs.to_absolute("a//b/./c"), abs(&["~", "Documents", "Notes", "a", "b", "c"]));
    }

    #[test]
    fn list_hides_hidden_directories() {
        let fs = seeded();
        let names = fs.list("").unwrap();
        assert!(names.contains(&"Documents"));
        assert!(!names.contains(&".ssh"));
        assert!(!names.contains(&".secrets"));
        // Hidden dirs are still reachable by name.
        assert!(fs.list(".ssh").unwrap().contains(&"config"));
    }

    #[test]
    fn list_errors() {
        let fs = seeded();
        assert!(matches!(fs.list("nope"), Err(FsError::NotFound(p)) if p == "nope"));
        assert!(matches!(fs.list("kernel"), Err(FsError::NotADirectory(_))));
    }

    #[test]
    fn cd_and_back_up() {
        let mut fs = seeded();
        assert_eq!(fs.set_cwd("Documents").unwrap(), abs(&["~", "Documents"]).as_slice());
        fs.set_cwd("..").unwrap();
        assert_eq!(fs.cwd_string(), "~");
        fs.set_cwd("..").unwrap();
        assert_eq!(fs.cwd_string(), "~");
        assert!(matches!(fs.set_cwd("kernel"), Err(FsError::NotADirectory(_))));
        assert!(matches!(fs.set_cwd("ghost"), Err(FsError::NotFound(_))));
        assert_eq!(fs.cwd_string(), "~");
    }

    #[test]
    fn read_file_and_directory_error() {
        let fs = seeded();
        assert_eq!(fs.read_file("~/etc/motd").unwrap(), "Welcome to LucasOS");
        assert!(matches!(fs.read_file("etc"), Err(FsError::IsADirectory(_))));
        assert!(matches!(fs.read_file("ghost"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn touch_never_truncates() {
        let mut fs = seeded();
        assert!(!fs.create_file("~/etc/motd").unwrap());
        assert_eq!(fs.read_file("~/etc/motd").unwrap(), "Welcome to LucasOS");
        assert!(fs.create_file("new.txt").unwrap());
        assert_eq!(fs.read_file("new.txt").unwrap(), "");
        assert!(matches!(fs.create_file("ghost/new.txt"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn mkdir_rejects_existing() {
        let mut fs = seeded();
        fs.create_dir("projects").unwrap();
        assert!(fs.lookup("projects").is_some_and(Node::is_dir));
        assert!(matches!(fs.create_dir("projects"), Err(FsError::AlreadyExists(_))));
    }

    #[test]
    fn write_file_creates_in_existing_parent() {
        let mut fs = seeded();
        fs.write_file(&abs(&["~", "Downloads", "a.txt"]), "hello").unwrap();
        assert_eq!(fs.read_file("Downloads/a.txt").unwrap(), "hello");
        fs.write_file(&abs(&["~", "Downloads", "a.txt"]), "bye").unwrap();
        assert_eq!(fs.read_file("Downloads/a.txt").unwrap(), "bye");
        assert!(fs.write_file(&abs(&["~", "nope", "a.txt"]), "x").is_err());
        assert!(fs.write_file(&abs(&["~", "Downloads"]), "x").is_err());
    }

    #[test]
    fn remove_entries_but_not_home() {
        let mut fs = seeded();
        let removed = fs.remove(&abs(&["~", "kernel"])).unwrap();
        assert!(removed.is_file());
        assert!(fs.lookup("kernel").is_none());
        assert!(matches!(fs.remove(&abs(&["~", "kernel"])), Err(FsError::NotFound(_))));
        assert!(matches!(fs.remove(&abs(&["~"])), Err(FsError::RemoveRoot)));
    }

    #[test]
    fn removing_cwd_moves_to_parent() {
        let mut fs = seeded();
        fs.set_cwd("Documents/Notes").unwrap();
        fs.remove(&abs(&["~", "Documents"])).unwrap();
        assert_eq!(fs.cwd_string(), "~");
    }

    #[test]
    fn pdf_nodes_carry_src_and_mime() {
        let fs = seeded();
        let cv = fs.lookup("~/Documents/CV_Lucas_Colaco.pdf").unwrap();
        assert_eq!(cv.mime(), Some("application/pdf"));
        assert_eq!(cv.src(), Some("/files/CV_Lucas_Colaco.pdf"));
        assert_eq!(cv.content(), Some(""));
    }

    #[test]
    fn bad_json_is_a_seed_error() {
        assert!(matches!(VirtualFs::from_json("{"), Err(FsError::Seed(_))));
    }

    #[test]
    fn file_root_becomes_empty_directory() {
        let fs = VirtualFs::new(Node::file());
        assert!(fs.resolve(&abs(&["~"])).is_some_and(Node::is_dir));
    }
}
