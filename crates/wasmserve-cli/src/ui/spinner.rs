//! Spinner for waiting on external tools.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Spinner shown while a compiler or CSS tool runs.
///
/// Falls back to a hidden bar when stderr is not a terminal, so finish
/// messages still print but nothing animates.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = if super::interactive() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
            {
                pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());

        Self { pb }
    }

    /// Update spinner message while it's running.
    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Finish with a green checkmark.
    pub fn finish(&self, message: &str) {
        self.finish_with(format!("{} {}", "✓".green(), message));
    }

    /// Finish with a red cross.
    pub fn fail(&self, message: &str) {
        self.finish_with(format!("{} {}", "✗".red(), message));
    }

    fn finish_with(&self, line: String) {
        if self.pb.is_hidden() {
            self.pb.finish_and_clear();
            eprintln!("{}", line);
        } else {
            self.pb.finish_with_message(line);
        }
    }
}
