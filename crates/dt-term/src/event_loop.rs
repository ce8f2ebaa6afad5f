// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: wires stdin, the key router, and the application together.
//
// Stdin chunks arrive from the background reader and get parsed into key
// events. The application handles each key by writing to a `Surface`, and
// the surface is flushed to the terminal once per batch so a full editor
// redraw lands in a single write.
//
// The loop blocks on the stdin channel with a short timeout. A timeout does
// two jobs: it resolves a pending lone ESC into an Escape keypress, and it
// drives `App::on_tick` so the startup loader can animate while the user
// is (or isn't) typing.
//
// Terminal resize is detected via a SIGWINCH handler that sets an
// `AtomicBool`; the loop checks it every iteration.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::input::{KeyEvent, Parser};
use crate::reader::StdinReader;
use crate::surface::{StdoutSurface, Surface};
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, cleared by the loop.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a signal handler for SIGWINCH. The handler only stores to an
/// atomic, which is async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
const fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Only [`on_key`](App::on_key) is required.
pub trait App {
    /// Called once, after the terminal is set up and before any input.
    fn on_start(&mut self, _out: &mut dyn Surface) {}

    /// Handle one key.
    fn on_key(&mut self, key: KeyEvent, out: &mut dyn Surface) -> Action;

    /// The terminal was resized.
    fn on_resize(&mut self, _size: Size, _out: &mut dyn Surface) {}

    /// Called every loop iteration with the current time.
    fn on_tick(&mut self, _now: Instant, _out: &mut dyn Surface) -> Action {
        Action::Continue
    }
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Timing configuration for the event loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// How long to wait for input before ticking (microseconds).
    ///
    /// Also the worst-case delay on a lone Escape. Default: 16 ms.
    pub tick_interval_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: 16_000,
        }
    }
}

// ─── Event Loop ──────────────────────────────────────────────────────────────

/// Owns the terminal, the key router, and the output surface.
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    surface: StdoutSurface,
    config: LoopConfig,
}

impl EventLoop {
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        let terminal = Terminal::new()?;
        let surface = StdoutSurface::new(terminal.size());
        Ok(Self {
            terminal,
            parser: Parser::new(),
            surface,
            config,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application returns [`Action::Quit`] or stdin closes.
    ///
    /// The terminal is restored on exit even if the loop errors.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, teardown, or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let (mut reader, rx) = StdinReader::spawn();
        let result = self.run_inner(app, &rx);

        reader.stop();
        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let timeout = Duration::from_micros(self.config.tick_interval_us);

        app.on_start(&mut self.surface);
        self.surface.flush()?;

        loop {
            let keys = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) => self.parser.flush(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("stdin closed");
                    return Ok(());
                }
            };

            for key in keys {
                if app.on_key(key, &mut self.surface) == Action::Quit {
                    return self.surface.flush();
                }
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                self.surface.set_size(size);
                app.on_resize(size, &mut self.surface);
            }

            if app.on_tick(Instant::now(), &mut self.surface) == Action::Quit {
                return self.surface.flush();
            }

            self.surface.flush()?;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::surface::MemorySurface;

    /// Echoes printable keys, quits on `q`.
    struct Echo {
        ticks: usize,
    }

    impl App for Echo {
        fn on_key(&mut self, key: KeyEvent, out: &mut dyn Surface) -> Action {
            match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char(ch) => {
                    out.write(ch.encode_utf8(&mut [0; 4]));
                    Action::Continue
                }
                _ => Action::Continue,
            }
        }

        fn on_tick(&mut self, _now: Instant, _out: &mut dyn Surface) -> Action {
            self.ticks += 1;
            Action::Continue
        }
    }

    #[test]
    fn default_tick_is_16ms() {
        assert_eq!(LoopConfig::default().tick_interval_us, 16_000);
    }

    #[test]
    fn app_defaults_are_noops() {
        let mut app = Echo { ticks: 0 };
        let mut out = MemorySurface::new();
        app.on_start(&mut out);
        app.on_resize(Size { cols: 1, rows: 1 }, &mut out);
        assert_eq!(out.output(), "");
    }

    #[test]
    fn app_sees_keys_through_surface() {
        let mut app = Echo { ticks: 0 };
        let mut out = MemorySurface::new();
        for key in crate::input::parse_all(b"hiq") {
            if app.on_key(key, &mut out) == Action::Quit {
                break;
            }
        }
        assert_eq!(out.output(), "hi");
        assert_eq!(app.on_tick(Instant::now(), &mut out), Action::Continue);
        assert_eq!(app.ticks, 1);
    }

    #[test]
    fn event_loop_new_succeeds() {
        let el = EventLoop::new().unwrap();
        assert!(el.size().cols > 0);
    }

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }
}
