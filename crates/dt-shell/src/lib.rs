//! # dt-shell: the terminal app of the desktop
//!
//! A line-editing shell over an in-memory home directory:
//!
//! - **[`shell`]**: `Shell`: key routing, line editing, busy window
//! - **[`history`]**: Up/Down recall with a stashed draft
//! - **[`complete`]**: Tab completion of commands and paths
//! - **[`confirm`]**: the yes/no prompt in front of dangerous commands
//! - **[`commands`]**: the dispatch table and every built-in command
//! - **[`session`]**: context handed to commands, duck-mode state
//! - **[`fs`]**: the virtual file tree
//! - **[`windows`]**: the desktop window host
//! - **[`boot`]**: the startup loader
//! - **[`config`]**: `DESKTERM_*` settings

pub mod boot;
pub mod commands;
pub mod complete;
pub mod config;
pub mod confirm;
pub mod fs;
pub mod history;
pub mod session;
pub mod shell;
pub mod windows;

pub use commands::{CommandTable, Outcome};
pub use config::{ConfigError, ShellConfig};
pub use fs::{FsError, SharedFs, VirtualFs};
pub use session::Session;
pub use shell::Shell;
pub use windows::{WindowHost, WindowRegistry};
