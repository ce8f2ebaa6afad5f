// SPDX-License-Identifier: MIT
//
// deskterm: the terminal app of a web desktop, as a real terminal program.
//
// This binary wires the crates together:
//
//   dt-term   → raw mode, key router, ANSI surface, event loop
//   dt-editor → the modal editor behind `vim`
//   dt-shell  → line editor, commands, virtual home directory
//
// Each keypress flows through:
//
//   stdin → parser → Shell::handle_key → shell / confirm prompt / editor
//         → Surface writes → one flush per input batch
//
// Settings come from DESKTERM_* variables (see dt_shell::config) and a few
// flags. Logging is off unless DESKTERM_LOG holds a filter; it then goes to
// DESKTERM_LOG_FILE (default deskterm.log), never to the raw-mode screen.

use std::env;
use std::fs::File;
use std::io;
use std::process;
use std::sync::Mutex;

use dt_shell::{Shell, ShellConfig};
use dt_term::EventLoop;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: deskterm [--no-boot]

options:
  --no-boot    skip the startup loader
  -h, --help   show this help
  --version    show the version

environment:
  DESKTERM_PROMPT, DESKTERM_USER, DESKTERM_HOST,
  DESKTERM_BOOT, DESKTERM_SHIFTWIDTH,
  DESKTERM_LOG (filter, e.g. deskterm=debug), DESKTERM_LOG_FILE";

const LOG_VAR: &str = "DESKTERM_LOG";
const LOG_FILE_VAR: &str = "DESKTERM_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "deskterm.log";

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cli {
    Run { boot: bool },
    Help,
    Version,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli, String> {
    let mut boot = true;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Cli::Help),
            "--version" => return Ok(Cli::Version),
            "--no-boot" => boot = false,
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }
    Ok(Cli::Run { boot })
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install the file logger if `DESKTERM_LOG` is set.
fn init_logging() -> io::Result<()> {
    let Ok(filter) = env::var(LOG_VAR) else {
        return Ok(());
    };
    let path = env::var(LOG_FILE_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_owned());
    let file = File::create(&path)?;

    // A second subscriber (tests, embedding) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let boot = match parse_args(env::args().skip(1)) {
        Ok(Cli::Run { boot }) => boot,
        Ok(Cli::Help) => {
            println!("{USAGE}");
            return;
        }
        Ok(Cli::Version) => {
            println!("deskterm {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(e) => {
            eprintln!("deskterm: {e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    let mut config = ShellConfig::from_env().unwrap_or_else(|e| {
        eprintln!("deskterm: {e}");
        process::exit(2);
    });
    config.boot_animation &= boot;

    if let Err(e) = init_logging() {
        eprintln!("deskterm: cannot open log file: {e}");
        process::exit(1);
    }

    let mut event_loop = EventLoop::new().unwrap_or_else(|e| {
        eprintln!("deskterm: failed to initialize terminal: {e}");
        process::exit(1);
    });

    let mut shell = Shell::standard(&config, event_loop.size()).unwrap_or_else(|e| {
        eprintln!("deskterm: {e}");
        process::exit(1);
    });

    tracing::info!(size = ?event_loop.size(), boot = config.boot_animation, "starting");
    if let Err(e) = event_loop.run(&mut shell) {
        eprintln!("deskterm: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, String> {
        parse_args(args.iter().map(|&a| a.to_owned()))
    }

    #[test]
    fn no_args_runs_with_boot() {
        assert_eq!(parse(&[]), Ok(Cli::Run { boot: true }));
    }

    #[test]
    fn no_boot_flag() {
        assert_eq!(parse(&["--no-boot"]), Ok(Cli::Run { boot: false }));
    }

    #[test]
    fn help_and_version_win() {
        assert_eq!(parse(&["--no-boot", "-h"]), Ok(Cli::Help));
        assert_eq!(parse(&["--help"]), Ok(Cli::Help));
        assert_eq!(parse(&["--version"]), Ok(Cli::Version));
    }

    #[test]
    fn unknown_options_are_errors() {
        assert_eq!(parse(&["-x"]), Err("unknown option: -x".into()));
        assert_eq!(parse(&["file.txt"]), Err("unexpected argument: file.txt".into()));
    }

    #[test]
    fn usage_mentions_every_flag() {
        for flag in ["--no-boot", "--help", "--version"] {
            assert!(USAGE.contains(flag), "{flag}");
        }
    }
}
