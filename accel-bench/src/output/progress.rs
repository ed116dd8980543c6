//! Spinner-style progress indicator for batch runs, using indicatif.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter shown while the catalog is being dispatched.
pub struct RunProgress {
    bar: ProgressBar,
}

impl RunProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} running {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    /// Finish and clear the spinner so result lines print cleanly.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Callback compatible with the dispatch loop's progress hook.
    pub fn callback(&self) -> impl Fn(&str) + '_ {
        move |benchmark: &str| {
            self.bar.set_message(benchmark.to_string());
        }
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}
