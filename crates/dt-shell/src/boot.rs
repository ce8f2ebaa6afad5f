//! Startup loader shown while the shell is busy.
//!
//! A script of plain lines and progress bars, played one frame per
//! [`BootSequence::step`]. The shell calls `step` from its tick whenever
//! [`FRAME_INTERVAL`] has passed, so the output is the same on every run;
//! only its pacing depends on the clock.
//!
//! A progress line redraws in place:
//!
//! ```text
//! \r\x1b[2KLoading kernel [■■■■■□□□□□]  50%
//! ```

use std::time::Duration;

use dt_term::Surface;
use dt_term::ansi::ERASE_LINE;

/// Time between frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(60);

/// Percent added per progress frame.
pub const PERCENT_STEP: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarStyle {
    /// `■■■□□□`
    Modern,
    /// `███▌  `
    Classic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootLine {
    Text(&'static str),
    Progress {
        label: &'static str,
        width: usize,
        style: BarStyle,
    },
}

/// Render a bar `width` cells wide at `percent` (clamped to 100).
#[must_use]
pub fn render_bar(percent: u8, width: usize, style: BarStyle) -> String {
    let percent = usize::from(percent.min(100));
    let filled = percent * width / 100;
    match style {
        BarStyle::Modern => {
            let mut bar = "■".repeat(filled);
            bar.push_str(&"□".repeat(width - filled));
            bar
        }
        BarStyle::Classic if percent > 0 && percent < 100 && width > 0 => {
            let body = filled.saturating_sub(1);
            let mut bar = "█".repeat(body);
            bar.push('▌');
            bar.push_str(&" ".repeat(width - body - 1));
            bar
        }
        BarStyle::Classic => {
            let mut bar = "█".repeat(filled);
            bar.push_str(&" ".repeat(width - filled));
            bar
        }
    }
}

// ---------------------------------------------------------------------------
// BootSequence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BootSequence {
    script: Vec<BootLine>,
    line: usize,
    /// Frames already drawn for the current progress line.
    frame: u8,
}

impl BootSequence {
    #[must_use]
    pub const fn new(script: Vec<BootLine>) -> Self {
        Self {
            script,
            line: 0,
            frame: 0,
        }
    }

    /// The loader the desktop boots with.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            BootLine::Text("LucasOS bootloader v1.0"),
            BootLine::Progress {
                label: "Loading kernel",
                width: 20,
                style: BarStyle::Modern,
            },
            BootLine::Text("[  OK  ] Mounted /home/lucas"),
            BootLine::Text("[  OK  ] Started duck daemon"),
            BootLine::Progress {
                label: "Starting desktop",
                width: 20,
                style: BarStyle::Classic,
            },
            BootLine::Text("Welcome to LucasOS"),
        ])
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.line >= self.script.len()
    }

    /// Draw the next frame. Returns `false` once the script is finished.
    pub fn step(&mut self, out: &mut dyn Surface) -> bool {
        let Some(line) = self.script.get(self.line) else {
            return false;
        };
        match *line {
            BootLine::Text(text) => {
                out.writeln(text);
                self.line += 1;
            }
            BootLine::Progress { label, width, style } => {
                let percent = self.frame.saturating_mul(PERCENT_STEP).min(100);
                let bar = render_bar(percent, width, style);
                out.write(&format!("\r{ERASE_LINE}{label} [{bar}] {percent:>3}%"));
                if percent >= 100 {
                    out.write("\r\n");
                    self.line += 1;
                    self.frame = 0;
                } else {
                    self.frame += 1;
                }
            }
        }
        !self.is_done()
    }

    /// Play every remaining frame at once.
    pub fn finish(&mut self, out: &mut dyn Surface) {
        while self.step(out) {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dt_term::MemorySurface;
    use pretty_assertions::assert_eq;

    #[test]
    fn modern_bar() {
        assert_eq!(render_bar(0, 4, BarStyle::Modern), "□□□□");
        assert_eq!(render_bar(50, 4, BarStyle::Modern), "■■□□");
        assert_eq!(render_bar(100, 4, BarStyle::Modern), "■■■■");
        assert_eq!(render_bar(250, 4, BarStyle::Modern), "■■■■");
    }

    #[test]
    fn classic_bar_has_a_head_midway() {
        assert_eq!(render_bar(0, 4, BarStyle::Classic), "    ");
        assert_eq!(render_bar(10, 4, BarStyle::Classic), "▌   ");
        assert_eq!(render_bar(50, 4, BarStyle::Classic), "█▌  ");
        assert_eq!(render_bar(100, 4, BarStyle::Classic), "████");
    }

    #[test]
    fn bars_keep_their_width() {
        for percent in 0..=100 {
            for style in [BarStyle::Modern, BarStyle::Classic] {
                assert_eq!(render_bar(percent, 10, style).chars().count(), 10);
            }
        }
    }

    #[test]
    fn plays_script_frame_by_frame() {
        let mut boot = BootSequence::new(vec![
            BootLine::Text("hello"),
            BootLine::Progress {
                label: "load",
                width: 2,
                style: BarStyle::Modern,
            },
        ]);
        let mut out = MemorySurface::new();

        assert!(boot.step(&mut out));
        assert_eq!(out.take(), "hello\r\n");

        assert!(boot.step(&mut out));
        assert_eq!(out.take(), "\r\x1b[2Kload [□□]   0%");

        for _ in 0..9 {
            assert!(boot.step(&mut out));
        }
        assert!(out.take().ends_with("load [■□]  90%"));

        assert!(!boot.step(&mut out));
        assert_eq!(out.take(), "\r\x1b[2Kload [■■] 100%\r\n");
        assert!(boot.is_done());
        assert!(!boot.step(&mut out));
        assert_eq!(out.output(), "");
    }

    #[test]
    fn standard_script_finishes_with_welcome() {
        let mut boot = BootSequence::standard();
        let mut out = MemorySurface::new();
        boot.finish(&mut out);
        assert!(boot.is_done());
        assert!(out.output().starts_with("LucasOS bootloader v1.0\r\n"));
        assert!(out.output().ends_with("Welcome to LucasOS\r\n"));
    }
}
