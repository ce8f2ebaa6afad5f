//! Basics, window control and system flavor commands.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

use super::{CommandTable, Outcome};
use crate::session::Session;
use crate::windows::WindowError;

pub(super) fn register(table: &mut CommandTable) {
    table.insert("help", help);
    table.insert("clear", clear);
    table.insert("echo", echo);
    table.insert("whoami", whoami);
    table.insert("date", date);
    table.insert("uptime", uptime);
    table.insert("sudo", sudo);
    table.insert("hack", hack);
    table.insert("fortune", fortune);
    table.insert("open", open);
    table.insert("close", close);
    table.insert("minimize", minimize);
    table.insert("maximize", maximize);
    table.insert("exit", exit);
}

pub const HELP: &str = "\
Available commands:
# Basics
- help               Show this help menu
- clear              Clear the terminal screen
- echo [text]        Print text back
- exit               Leave the terminal

# File system
- ls [dir]           List items (defaults to current directory)
- cd [dir]           Change directory
- pwd                Print current directory
- mkdir [dir]        Create a new directory
- touch [file]       Create a new file
- cat [file]         Display file contents
- rm [name]          Delete a file or folder (dangerous!)
- xdg-open [FILE|URL] Open a file or URL (PDF/text opens viewer)

# Editor
- vim [files...]     Open a minimal editor for one or more files

# Apps & windows
- open [app]         Open an app (e.g. open about)
- close [app]        Close an app
- minimize [app]     Minimize an app
- maximize [app]     Toggle fullscreen for an app

# System info & fun
- whoami             Show user identity
- date               Show current date/time
- uptime             Time since terminal was opened
- sudo               Attempt superuser privileges (good luck)
- hack               Try (and fail) to breach the mainframe
- fortune            Print a short fortune";

fn help(_: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text(HELP)
}

fn clear(_: &mut Session, _: &[&str]) -> Outcome {
    Outcome::Clear
}

fn echo(_: &mut Session, args: &[&str]) -> Outcome {
    Outcome::Text(args.join(" "))
}

fn whoami(session: &mut Session, _: &[&str]) -> Outcome {
    Outcome::Text(format!("{}@{}:~$", session.user, session.host))
}

fn date(_: &mut Session, _: &[&str]) -> Outcome {
    // The local offset is unavailable in some multithreaded processes.
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Outcome::Text(
        now.format(&Rfc2822)
            .unwrap_or_else(|e| format!("date: {e}")),
    )
}

fn uptime(session: &mut Session, _: &[&str]) -> Outcome {
    Outcome::Text(format!("Uptime: {} seconds", session.uptime()))
}

fn sudo(_: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text("You have no power here.")
}

fn hack(_: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text("Attempting to breach the mainframe...\nACCESS DENIED\nYour IP has been logged 😈")
}

fn fortune(_: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text("You will debug something for 6 hours just to realize it's a typo.")
}

fn exit(_: &mut Session, _: &[&str]) -> Outcome {
    Outcome::Exit
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Shared shape of the window commands: usage check, host call, message.
fn window_command(
    verb: &str,
    args: &[&str],
    action: impl FnOnce(&str) -> Result<(), WindowError>,
    done: impl FnOnce(&str) -> String,
) -> Outcome {
    let Some(&app) = args.first() else {
        return Outcome::Text(format!("Specify an app to {verb}."));
    };
    match action(app) {
        Ok(()) => Outcome::Text(done(app)),
        Err(e) => Outcome::Text(format!("{verb}: {e}")),
    }
}

fn open(session: &mut Session, args: &[&str]) -> Outcome {
    window_command(
        "open",
        args,
        |app| session.windows.open(app, None),
        |app| format!("Opening \"{app}\" app..."),
    )
}

fn close(session: &mut Session, args: &[&str]) -> Outcome {
    window_command(
        "close",
        args,
        |app| session.windows.close(app),
        |app| format!("Closing \"{app}\" app..."),
    )
}

fn minimize(session: &mut Session, args: &[&str]) -> Outcome {
    window_command(
        "minimize",
        args,
        |app| session.windows.minimize(app),
        |app| format!("Minimizing \"{app}\"..."),
    )
}

fn maximize(session: &mut Session, args: &[&str]) -> Outcome {
    window_command(
        "maximize",
        args,
        |app| session.windows.toggle_fullscreen(app),
        |app| format!("Toggling fullscreen on \"{app}\"..."),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
