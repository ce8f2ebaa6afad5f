//! The line-editing shell.
//!
//! Every key lands in [`Shell::handle_key`], which routes it to one of
//! three places:
//!
//! ```text
//! editor open?          -> Editor::on_key, full redraw
//! confirmation pending? -> yes/no prompt
//! otherwise             -> line editor (echo, history, completion, Enter)
//! ```
//!
//! While the startup loader runs the shell is *busy*: typing still echoes,
//! but an entered line is parked in a single slot and runs once the loader
//! finishes. A later Enter replaces the parked line.

use std::time::Instant;

use dt_editor::{Editor, EditorEvent};
use dt_term::ansi::{BELL, ERASE_LINE, RUBOUT};
use dt_term::{Action, App, KeyCode, KeyEvent, Size, Surface};

use crate::boot::{BootSequence, FRAME_INTERVAL};
use crate::commands::{CommandTable, Outcome};
use crate::complete::{Completion, complete};
use crate::config::ShellConfig;
use crate::confirm::{Answer, PendingConfirm};
use crate::fs::{FsError, VirtualFs};
use crate::history::CommandHistory;
use crate::session::Session;
use crate::windows::WindowRegistry;

/// Prompt shown while a confirmation waits for its answer.
const ANSWER_PROMPT: &str = "> ";

// ---------------------------------------------------------------------------
// ShellState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    pub prompt: String,
    pub busy: bool,
    /// Line entered while busy. Last write wins.
    pub pending_command: Option<String>,
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

pub struct Shell {
    state: ShellState,
    line: String,
    history: CommandHistory,
    confirm: Option<PendingConfirm>,
    session: Session,
    commands: CommandTable,
    editor: Option<Editor>,
    boot: Option<BootSequence>,
    next_frame: Option<Instant>,
    boot_animation: bool,
    shift_width: usize,
    size: Size,
}

impl Shell {
    #[must_use]
    pub fn new(config: &ShellConfig, session: Session, size: Size) -> Self {
        Self {
            state: ShellState {
                prompt: config.prompt.clone(),
                busy: false,
                pending_command: None,
            },
            line: String::new(),
            history: CommandHistory::new(),
            confirm: None,
            session,
            commands: CommandTable::standard(),
            editor: None,
            boot: None,
            next_frame: None,
            boot_animation: config.boot_animation,
            shift_width: config.shift_width,
            size,
        }
    }

    /// A shell over the seeded home directory and the default desktop.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Seed`] if the built-in tree does not parse.
    pub fn standard(config: &ShellConfig, size: Size) -> Result<Self, FsError> {
        let fs = VirtualFs::seeded()?.shared();
        let session = Session::new(fs, Box::new(WindowRegistry::default()), config);
        Ok(Self::new(config, session, size))
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn state(&self) -> &ShellState {
        &self.state
    }

    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.state.prompt
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.state.busy
    }

    #[must_use]
    pub fn pending_command(&self) -> Option<&str> {
        self.state.pending_command.as_deref()
    }

    #[must_use]
    pub const fn history(&self) -> &CommandHistory {
        &self.history
    }

    #[must_use]
    pub const fn is_confirming(&self) -> bool {
        self.confirm.is_some()
    }

    #[must_use]
    pub const fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Start the loader, or show the first prompt if it is disabled.
    pub fn start(&mut self, now: Instant, out: &mut dyn Surface) {
        if self.boot_animation {
            self.boot = Some(BootSequence::standard());
            self.next_frame = None;
            self.set_busy(true, out);
            let _ = self.tick(now, out);
        } else {
            self.write_prompt(out);
        }
    }

    /// Advance the loader if a frame is due. The loader's end runs the
    /// parked command, which may quit.
    pub fn tick(&mut self, now: Instant, out: &mut dyn Surface) -> Action {
        let Some(boot) = self.boot.as_mut() else {
            return Action::Continue;
        };
        if self.next_frame.is_some_and(|due| now < due) {
            return Action::Continue;
        }
        self.next_frame = Some(now + FRAME_INTERVAL);
        if boot.step(out) {
            return Action::Continue;
        }
        self.boot = None;
        self.next_frame = None;
        self.set_busy(false, out)
    }

    /// Enter or leave the busy window. Leaving it shows the prompt and runs
    /// the parked command, if any.
    pub fn set_busy(&mut self, busy: bool, out: &mut dyn Surface) -> Action {
        let was_busy = std::mem::replace(&mut self.state.busy, busy);
        if busy || !was_busy {
            return Action::Continue;
        }
        tracing::debug!("shell ready");
        self.write_prompt(out);
        match self.state.pending_command.take() {
            Some(command) => {
                out.write("\r\n");
                self.run(&command, out)
            }
            None => Action::Continue,
        }
    }

    pub fn resize(&mut self, size: Size, out: &mut dyn Surface) {
        self.size = size;
        if let Some(editor) = self.editor.as_mut() {
            editor.resize(size);
            out.write(&editor.screen());
        }
    }

    // -- Keys ---------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent, out: &mut dyn Surface) -> Action {
        if self.editor.is_some() {
            self.editor_key(key, out);
            return Action::Continue;
        }
        if self.confirm.is_some() {
            self.confirm_key(key, out);
            return Action::Continue;
        }

        if key.is_ctrl('c') {
            self.line.clear();
            self.history.reset();
            out.write("^C\r\n");
            self.write_prompt(out);
            return Action::Continue;
        }

        match key.code {
            KeyCode::Enter => return self.submit(out),
            KeyCode::Backspace => {
                if self.line.pop().is_some() {
                    out.write(RUBOUT);
                }
                self.history.reset();
            }
            KeyCode::Up => {
                if let Some(entry) = self.history.older(&self.line) {
                    self.line = entry.to_owned();
                    self.redraw_line(out);
                }
            }
            KeyCode::Down => {
                if let Some(entry) = self.history.newer() {
                    self.line = entry;
                    self.redraw_line(out);
                }
            }
            KeyCode::Tab => self.complete(out),
            _ => {
                if let Some(ch) = key.printable() {
                    self.line.push(ch);
                    let mut buf = [0; 4];
                    out.write(ch.encode_utf8(&mut buf));
                }
            }
        }
        Action::Continue
    }

    fn submit(&mut self, out: &mut dyn Surface) -> Action {
        let line = std::mem::take(&mut self.line);
        if line.trim().is_empty() {
            out.write("\r\n");
            if !self.state.busy {
                self.write_prompt(out);
            }
            return Action::Continue;
        }
        if self.state.busy {
            tracing::debug!(line, "parked while busy");
            self.state.pending_command = Some(line);
            return Action::Continue;
        }
        out.write("\r\n");
        self.run(&line, out)
    }

    /// Run one line and show its outcome.
    fn run(&mut self, line: &str, out: &mut dyn Surface) -> Action {
        self.history.push(line);
        let Some(outcome) = self.commands.dispatch(&mut self.session, line) else {
            self.write_prompt(out);
            return Action::Continue;
        };

        match outcome {
            Outcome::Text(text) => {
                write_text(&text, out);
                self.write_prompt(out);
            }
            Outcome::Clear => {
                out.clear();
                self.write_prompt(out);
            }
            Outcome::Confirm { message, perform } => {
                tracing::debug!(message, "confirmation");
                let restore = std::mem::take(&mut self.state.prompt);
                out.writeln(&message);
                out.write(ANSWER_PROMPT);
                self.confirm = Some(PendingConfirm::new(perform, restore));
            }
            Outcome::Edit(specs) => {
                let editor = Editor::new(specs, self.size).with_shift_width(self.shift_width);
                out.write(&editor.screen());
                self.editor = Some(editor);
            }
            Outcome::Exit => return Action::Quit,
        }
        Action::Continue
    }

    fn confirm_key(&mut self, key: KeyEvent, out: &mut dyn Surface) {
        let Some(pending) = self.confirm.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => match pending.take_answer() {
                Answer::Invalid => out.write("\r\nPlease answer Y or N.\r\n> "),
                answer => {
                    out.write("\r\n");
                    if let Some(pending) = self.confirm.take() {
                        let (perform, prompt) = pending.finish();
                        if answer == Answer::Yes {
                            let text = perform(&mut self.session);
                            write_text(&text, out);
                        } else {
                            out.writeln("Aborted.");
                        }
                        tracing::debug!(?answer, "confirmation answered");
                        self.state.prompt = prompt;
                        self.write_prompt(out);
                    }
                }
            },
            KeyCode::Backspace => {
                if pending.backspace() {
                    out.write(RUBOUT);
                }
            }
            _ => {
                if let Some(ch) = key.printable() {
                    pending.push(ch);
                    let mut buf = [0; 4];
                    out.write(ch.encode_utf8(&mut buf));
                }
            }
        }
    }

    fn editor_key(&mut self, key: KeyEvent, out: &mut dyn Surface) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match editor.on_key(key) {
            EditorEvent::Continue => out.write(&editor.screen()),
            EditorEvent::Exit { saved } => {
                tracing::debug!(saved, "editor closed");
                self.editor = None;
                out.clear();
                out.write("Exited editor\r\n");
                self.write_prompt(out);
            }
        }
    }

    fn complete(&mut self, out: &mut dyn Surface) {
        let names = self.commands.names();
        let completion = complete(&self.line, &names, &self.session.fs.borrow());
        match completion {
            Completion::Replace(new) => {
                if let Some(suffix) = new.strip_prefix(self.line.as_str()) {
                    out.write(suffix);
                    self.line = new;
                } else {
                    self.line = new;
                    self.redraw_line(out);
                }
            }
            Completion::List(items) => {
                out.write(&format!(
                    "\r\n{}\r\n{}{}",
                    items.join("  "),
                    self.state.prompt,
                    self.line
                ));
            }
            Completion::Bell => out.write(BELL),
        }
    }

    // -- Output helpers -----------------------------------------------------

    fn write_prompt(&self, out: &mut dyn Surface) {
        out.write(&self.state.prompt);
    }

    fn redraw_line(&self, out: &mut dyn Surface) {
        out.write(&format!("\r{ERASE_LINE}{}{}", self.state.prompt, self.line));
    }
}

/// Print command output one line at a time. Empty output prints nothing.
fn write_text(text: &str, out: &mut dyn Surface) {
    if text.is_empty() {
        return;
    }
    for line in text.split('\n') {
        out.writeln(line);
    }
}

impl App for Shell {
    fn on_start(&mut self, out: &mut dyn Surface) {
        self.start(Instant::now(), out);
    }

    fn on_key(&mut self, key: KeyEvent, out: &mut dyn Surface) -> Action {
        self.handle_key(key, out)
    }

    fn on_resize(&mut self, size: Size, out: &mut dyn Surface) {
        self.resize(size, out);
    }

    fn on_tick(&mut self, now: Instant, out: &mut dyn Surface) -> Action {
        self.tick(now, out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
