use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress display for batch station processing. A silent reporter wraps a
/// hidden bar so callers never branch on it.
pub struct ProgressReporter {
    progress_bar: ProgressBar,
    silent: bool,
}

impl ProgressReporter {
    pub fn new(total: u64, message: &str, silent: bool) -> Self {
        if silent {
            return Self::hidden();
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} stations ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: pb,
            silent: false,
        }
    }

    pub fn hidden() -> Self {
        Self {
            progress_bar: ProgressBar::hidden(),
            silent: true,
        }
    }

    pub fn set_length(&self, total: u64) {
        self.progress_bar.set_length(total);
    }

    pub fn increment(&self, delta: u64) {
        self.progress_bar.inc(delta);
    }

    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    pub fn set_message(&self, message: &str) {
        self.progress_bar.set_message(message.to_string());
    }

    pub fn finish_with_message(&self, message: &str) {
        self.progress_bar.finish_with_message(message.to_string());
    }

    pub fn println(&self, message: &str) {
        if !self.silent {
            self.progress_bar.println(message);
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish();
        }
    }
}
