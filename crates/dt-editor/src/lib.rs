//! # dt-editor: the modal editor behind `vim`
//!
//! A small vi-like editor that draws through plain ANSI strings:
//!
//! - **[`position`]**: `Position` (line, col) and `Range`, 0-indexed
//! - **[`buffer`]**: `EditorBuffer`, one file as a list of lines, with a save hook
//! - **[`mode`]**: `Normal`, `Insert`, `Visual`, `CmdLine`
//! - **[`trie`]**: key-sequence trie with external walk cursors
//! - **[`motion`]**: `h j k l 0 $ gg G w }` resolved to ranges
//! - **[`operator`]**: `d c y > < g~ gu gU` applied to ranges
//! - **[`register`]**: the unnamed register for `p` / `P`
//! - **[`command`]**: the `:` line (`w`, `q`, `wq`, `x`)
//! - **[`view`]**: viewport and full-screen renderer
//! - **[`editor`]**: `Editor`, which ties it all to key events

pub mod buffer;
pub mod command;
pub mod editor;
pub mod mode;
pub mod motion;
pub mod operator;
pub mod position;
pub mod register;
pub mod trie;
pub mod view;

pub use buffer::{BufferSpec, EditorBuffer, SaveHook};
pub use editor::{Editor, EditorEvent, LastChange};
pub use mode::{Mode, VisualKind};
pub use position::{Position, Range, RangeKind};
