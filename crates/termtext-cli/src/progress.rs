//! Spinner shown on stderr while `exec` captures a command.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct CaptureSpinner {
    bar: ProgressBar,
}

impl CaptureSpinner {
    /// Start spinning; indicatif hides the bar when stderr is not a terminal.
    pub fn start(command: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("capturing {command}"));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
