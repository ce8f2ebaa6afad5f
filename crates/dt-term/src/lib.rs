// SPDX-License-Identifier: MIT
//
// dt-term: Terminal surface for deskterm.
//
// The layer between the raw terminal and the shell: a key event router that
// turns stdin bytes into classified keys, a `Surface` abstraction the shell
// and editor write their output to, raw-mode/alternate-screen control via
// termios, and the event loop that ties them together.
//
// No TUI framework sits underneath. Output is plain text plus a handful of
// ANSI sequences, exactly what a web terminal widget would accept.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod surface;
pub mod terminal;

pub use event_loop::{Action, App, EventLoop, LoopConfig};
pub use input::{KeyCode, KeyEvent, Modifiers, Parser};
pub use surface::{MemorySurface, StdoutSurface, Surface};
pub use terminal::Size;
