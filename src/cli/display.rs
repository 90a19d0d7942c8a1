//! Display utilities for the focusbell CLI.
//!
//! Timer snapshots go to stdout on a single, redrawn line; prompts and
//! errors go to stderr.

use std::io::Write;

use crate::types::{Mode, TimerState};
use crate::worker::ClientEvent;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Formats seconds as zero-padded `MM:SS`.
    pub fn format_time(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    /// Renders the status line for a snapshot.
    pub fn status_line(state: &TimerState) -> String {
        let status = if state.is_running { "running" } else { "paused" };
        let tabs: Vec<String> = Mode::ALL
            .iter()
            .map(|mode| {
                if *mode == state.mode {
                    format!("[{}]", mode.label())
                } else {
                    format!(" {} ", mode.label())
                }
            })
            .collect();
        format!(
            "{}  {}  {:<7}  cycles: {}",
            tabs.join(""),
            Self::format_time(state.remaining_seconds),
            status,
            state.completed_focus_cycles
        )
    }

    /// Redraws the status line in place.
    pub fn show_state(state: &TimerState) {
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\r\x1b[2K{}", Self::status_line(state));
        let _ = stdout.flush();
    }

    /// Shows the line commands.
    pub fn show_help() {
        println!("commands: start/pause (s, p or Enter)  reset (r)  focus  short  long  quit (q)");
    }

    /// Asks for notification permission.
    pub fn show_permission_prompt() {
        eprintln!();
        eprintln!("Allow desktop notifications? [y/n]");
    }

    /// Shows a request from the background worker.
    pub fn show_client_event(event: &ClientEvent) {
        match event {
            // Terminal bell.
            ClientEvent::Focus(_) => print!("\x07"),
            ClientEvent::Open(url) => {
                println!();
                println!("Open {} to continue.", url);
            }
        }
        let _ = std::io::stdout().flush();
    }

    /// Shows the result of `precache`.
    pub fn show_cache_report(root: &str, caches: &[String], entries: &[String]) {
        println!("deployment root: {}", root);
        println!("caches:");
        for cache in caches {
            println!("  {}", cache);
        }
        println!("cached assets:");
        for entry in entries {
            println!("  {}", entry);
        }
    }

    /// Shows a short notice on its own line.
    pub fn show_notice(message: &str) {
        println!();
        println!("{}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PomodoroConfig;

    mod format_time_tests {
        use super::*;

        #[test]
        fn test_format_time_zero() {
            assert_eq!(Display::format_time(0), "00:00");
        }

        #[test]
        fn test_format_time_full_focus() {
            assert_eq!(Display::format_time(1500), "25:00");
        }

        #[test]
        fn test_format_time_pads_seconds() {
            assert_eq!(Display::format_time(65), "01:05");
            assert_eq!(Display::format_time(9), "00:09");
        }

        #[test]
        fn test_format_time_long() {
            assert_eq!(Display::format_time(7200), "120:00");
        }
    }

    mod status_line_tests {
        use super::*;

        #[test]
        fn test_initial_state() {
            let state = TimerState::new(&PomodoroConfig::default());
            let line = Display::status_line(&state);

            assert!(line.contains("[Focus]"));
            assert!(line.contains("25:00"));
            assert!(line.contains("paused"));
            assert!(line.contains("cycles: 0"));
        }

        #[test]
        fn test_running_break() {
            let state = TimerState {
                mode: Mode::LongBreak,
                remaining_seconds: 899,
                is_running: true,
                completed_focus_cycles: 4,
            };
            let line = Display::status_line(&state);

            assert!(line.contains("[Long]"));
            assert!(!line.contains("[Focus]"));
            assert!(line.contains("14:59"));
            assert!(line.contains("running"));
            assert!(line.contains("cycles: 4"));
        }
    }
}
