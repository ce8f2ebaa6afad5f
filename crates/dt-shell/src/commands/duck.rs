//! Duck mode.
//!
//! Ten `quack`s switch the OS into duck mode. While it is on, [`overlay`]
//! answers a set of ordinary commands with quack-flavored text instead of
//! running them, and the duck commands below come alive. `unduck` resets
//! everything.

use std::time::Instant;

use super::{CommandTable, Outcome};
use crate::session::Session;

/// `quack` replies, picked by quack count.
pub const QUACK_REPLIES: &[&str] = &[
    "quack.",
    "QUACK!",
    "quack quack quack...",
    "bread?",
    "Where's the pond?",
    "*waddles aggressively*",
    "You dare speak to me, featherless biped?",
    "QuackdiOS is listening.",
    "System overheating: too much bread.",
    "What’s it like... to not be a duck?",
    "*stares at you with beady eyes*",
    "Why is this human talking to me?",
    "Did you just try to talk duck to me?",
    "Your IP has been logged... quack.",
    "404: Pond not found.",
    "Executing `quack --force`... complete.",
    "🦆🦆🦆🦆🦆",
];

pub const DUCK_HELP: &str = "\
DuckdiOS Command Menu (QUACK MODE):
- quack           Talk to the OS duck
- bread           Offer bread to the OS duck/
- pond            Visit the virtual pond
- duckmode        Check if you're in Duck Mode
- duckstats       See how long Duck Mode has been active
- unduck          Return to boring human mode
- waddle          Just... waddles
- honk?           no.";

const POND: &str = "\
~  ~   🦆    ~     ~
  ~     ~       ~    ~
       ~     🐟     ~    🪷
  You feel calm. The pond accepts you.";

pub(super) fn register(table: &mut CommandTable) {
    table.insert("quack", quack);
    table.insert("bread", bread);
    table.insert("pond", pond);
    table.insert("duck", duck);
    table.insert("duckmode", duckmode);
    table.insert("duckstats", duckstats);
    table.insert("unduck", unduck);
    table.insert("waddle", waddle);
}

/// Duck-mode replacement for an ordinary command, if it has one.
#[must_use]
pub fn overlay(name: &str, args: &[&str]) -> Option<String> {
    let first = args.first().copied().unwrap_or_default();
    let text = match name {
        "help" => DUCK_HELP.to_owned(),
        "cd" => "cd: ducks don't do directories.".to_owned(),
        "pwd" => "/pond/nest/bread".to_owned(),
        "mkdir" => "mkdir: ducks don't need folders, we have nests.".to_owned(),
        "touch" => "touch: touching files is weird. Try bread instead.".to_owned(),
        "cat" => "cat: QuackdiOS prefers ducks, not cats.".to_owned(),
        "rm" => "rm: Ducks never forget. But they also don't delete.".to_owned(),
        "vim" => "vim: Ducks prefer `quack` over `:wq`.".to_owned(),
        "sudo" => "🦆 You already have full duck privileges.".to_owned(),
        "hack" => "Hacking the pond security perimeter...\n🦆 Too powerful. Abort.".to_owned(),
        "fortune" => "One day, all computers will be made of breadcrumbs.".to_owned(),
        "whoami" => "duck@pond:~$".to_owned(),
        "date" => "🦆 It's always time for a swim.".to_owned(),
        "uptime" => "🦆 You've been quacking for far too long.".to_owned(),
        "echo" => format!("quack quack quack {}", "🦆".repeat(args.len())),
        "open" => format!("You try to open \"{first}\", but it's just... feathers."),
        "close" => format!("You try to close \"{first}\", but ducks don't close things."),
        "minimize" => "Minimizing? More like diving underwater.".to_owned(),
        "maximize" => "Maximizing? My feathers are already puffed.".to_owned(),
        "xdg-open" => format!("You try to xdg-open \"{first}\", but it's just.... feathers?"),
        _ => return None,
    };
    Some(text)
}

fn quack(session: &mut Session, _: &[&str]) -> Outcome {
    if session.duck.quack(Instant::now()) {
        tracing::debug!("duck mode on");
        return Outcome::text("🦆 Duck Mode activated. All commands must now be spoken in Quack.");
    }
    let idx = (session.duck.quacks as usize - 1) % QUACK_REPLIES.len();
    Outcome::text(QUACK_REPLIES[idx])
}

fn bread(session: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text(if session.duck.is_active() {
        "🍞 You toss a piece of bread. Somewhere, a duck smiles."
    } else {
        "bread: command not found. Try quack-ing first."
    })
}

fn pond(session: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text(if session.duck.is_active() {
        POND
    } else {
        "You approach the pond. Nothing happens."
    })
}

/// `cat`, for ducks.
fn duck(session: &mut Session, args: &[&str]) -> Outcome {
    if !session.duck.is_active() {
        return Outcome::text("duck: command only available in Duck Mode.");
    }
    let name = args.first().copied().unwrap_or_default();
    let fs = session.fs.borrow();
    Outcome::Text(match fs.read_file(name) {
        Ok(content) => content.to_owned(),
        Err(_) => format!("duck: {name}: No such file"),
    })
}

fn duckmode(session: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text(if session.duck.is_active() {
        "🦆 Duck Mode is currently ACTIVE."
    } else {
        "Duck Mode is OFF."
    })
}

fn duckstats(session: &mut Session, _: &[&str]) -> Outcome {
    match session.duck.active_for(Instant::now()) {
        Some(elapsed) => Outcome::Text(format!(
            "🦆 Duck Mode has been active for {} seconds.",
            elapsed.as_secs()
        )),
        None => Outcome::text("Duck Mode is OFF."),
    }
}

fn unduck(session: &mut Session, _: &[&str]) -> Outcome {
    session.duck.reset();
    tracing::debug!("duck mode off");
    Outcome::text("Duck Mode deactivated. You're no longer speaking quack.")
}

fn waddle(_: &mut Session, _: &[&str]) -> Outcome {
    Outcome::text("Waddle waddle")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::testing::{run, session};
    use super::*;

    fn ducked() -> Session {
        let mut s = session();
        for _ in 0..10 {
            run(&mut s, "quack");
        }
        s
    }

    #[test]
    fn quack_replies_rotate_then_duck_mode_turns_on() {
        let mut s = session();
        for expected in &QUACK_REPLIES[..9] {
            assert_eq!(run(&mut s, "quack"), *expected);
        }
        assert_eq!(
            run(&mut s, "quack"),
            "🦆 Duck Mode activated. All commands must now be spoken in Quack."
        );
        // The eleventh quack continues the rotation.
        assert_eq!(run(&mut s, "quack"), QUACK_REPLIES[10]);
    }

    #[test]
    fn duck_commands_before_duck_mode() {
        let mut s = session();
        assert_eq!(run(&mut s, "bread"), "bread: command not found. Try quack-ing first.");
        assert_eq!(run(&mut s, "pond"), "You approach the pond. Nothing happens.");
        assert_eq!(run(&mut s, "duck etc/motd"), "duck: command only available in Duck Mode.");
        assert_eq!(run(&mut s, "duckmode"), "Duck Mode is OFF.");
        assert_eq!(run(&mut s, "duckstats"), "Duck Mode is OFF.");
        assert_eq!(run(&mut s, "waddle"), "Waddle waddle");
    }

    #[test]
    fn duck_commands_in_duck_mode() {
        let mut s = ducked();
        assert!(run(&mut s, "bread").starts_with("🍞"));
        assert!(run(&mut s, "pond").ends_with("The pond accepts you."));
        assert_eq!(run(&mut s, "duck etc/motd"), "Welcome to LucasOS");
        assert_eq!(run(&mut s, "duck ghost"), "duck: ghost: No such file");
        assert_eq!(run(&mut s, "duckmode"), "🦆 Duck Mode is currently ACTIVE.");
        assert_eq!(run(&mut s, "duckstats"), "🦆 Duck Mode has been active for 0 seconds.");
    }

    #[test]
    fn overlay_replaces_ordinary_commands() {
        let mut s = ducked();
        assert!(run(&mut s, "help").starts_with("DuckdiOS Command Menu (QUACK MODE):"));
        assert_eq!(run(&mut s, "echo a b"), "quack quack quack 🦆🦆");
        assert_eq!(run(&mut s, "cd Documents"), "cd: ducks don't do directories.");
        assert_eq!(s.fs.borrow().cwd_string(), "~");
        assert_eq!(run(&mut s, "whoami"), "duck@pond:~$");
        assert_eq!(
            run(&mut s, "open about"),
            "You try to open \"about\", but it's just... feathers."
        );
        assert_eq!(run(&mut s, "rm kernel"), "rm: Ducks never forget. But they also don't delete.");
        assert!(s.fs.borrow().lookup("kernel").is_some());
        // Commands without a duck variant still run.
        assert!(run(&mut s, "ls").contains("Documents"));
    }

    #[test]
    fn unduck_resets_the_count() {
        let mut s = ducked();
        assert_eq!(
            run(&mut s, "unduck"),
            "Duck Mode deactivated. You're no longer speaking quack."
        );
        assert_eq!(run(&mut s, "pwd"), "~");
        assert_eq!(run(&mut s, "quack"), QUACK_REPLIES[0]);
    }

    #[test]
    fn overlay_covers_only_known_names() {
        assert!(overlay("ls", &[]).is_none());
        assert!(overlay("quack", &[]).is_none());
        assert_eq!(overlay("echo", &[]).as_deref(), Some("quack quack quack "));
    }
}
