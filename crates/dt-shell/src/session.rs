//! Per-shell context handed to every command handler.

use std::time::{Duration, Instant};

use crate::config::ShellConfig;
use crate::fs::SharedFs;
use crate::windows::WindowHost;

/// Quacks needed before the OS gives in.
pub const QUACKS_TO_DUCK_MODE: u32 = 10;

// ---------------------------------------------------------------------------
// DuckState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuckState {
    /// Total `quack`s since the last `unduck`.
    pub quacks: u32,
    /// When duck mode turned on.
    pub since: Option<Instant>,
}

impl DuckState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.since.is_some()
    }

    /// Count a quack. Returns `true` if this one switched duck mode on.
    pub fn quack(&mut self, now: Instant) -> bool {
        self.quacks = self.quacks.saturating_add(1);
        if self.quacks >= QUACKS_TO_DUCK_MODE && !self.is_active() {
            self.since = Some(now);
            return true;
        }
        false
    }

    /// How long duck mode has been on.
    #[must_use]
    pub fn active_for(&self, now: Instant) -> Option<Duration> {
        self.since.map(|since| now.saturating_duration_since(since))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    pub fs: SharedFs,
    pub windows: Box<dyn WindowHost>,
    pub duck: DuckState,
    pub started: Instant,
    pub user: String,
    pub host: String,
}

impl Session {
    #[must_use]
    pub fn new(fs: SharedFs, windows: Box<dyn WindowHost>, config: &ShellConfig) -> Self {
        Self {
            fs,
            windows,
            duck: DuckState::default(),
            started: Instant::now(),
            user: config.user.clone(),
            host: config.host.clone(),
        }
    }

    /// Seconds since the session started.
    #[must_use]
    pub fn uptime(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenth_quack_turns_duck_mode_on() {
        let now = Instant::now();
        let mut duck = DuckState::default();
        for _ in 1..QUACKS_TO_DUCK_MODE {
            assert!(!duck.quack(now));
        }
        assert!(!duck.is_active());
        assert!(duck.quack(now));
        assert!(duck.is_active());
        // Only the first crossing activates.
        assert!(!duck.quack(now));
        assert_eq!(duck.quacks, QUACKS_TO_DUCK_MODE + 1);
    }

    #[test]
    fn active_for_and_reset() {
        let start = Instant::now();
        let mut duck = DuckState {
            quacks: 9,
            since: None,
        };
        assert_eq!(duck.active_for(start), None);
        duck.quack(start);
        let later = start + Duration::from_secs(42);
        assert_eq!(duck.active_for(later), Some(Duration::from_secs(42)));
        duck.reset();
        assert_eq!(duck, DuckState::default());
    }
}
