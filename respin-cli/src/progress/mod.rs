//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use respin_core::ProgressListener;
use std::time::Duration;

/// Progress bar for one rewrite, fed by the engine's progress notifications
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Start a bar for the document `name`
    pub fn start_document(&mut self, name: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(100);
        if let Ok(style) =
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.set_message(name.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Finish the current bar
    pub fn finish_document(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressListener for ProgressReporter {
    fn progress(&self, percent: f32) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(percent.round() as u64);
        }
    }

    fn completed(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(100);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_has_no_bar() {
        let mut reporter = ProgressReporter::new(true);
        reporter.start_document("article.txt");
        assert!(reporter.progress_bar.is_none());
        reporter.progress(50.0);
        reporter.finish_document();
    }

    #[test]
    fn test_positions_follow_percentages() {
        let mut reporter = ProgressReporter::new(false);
        reporter.start_document("article.txt");
        reporter.progress(42.4);
        assert_eq!(reporter.progress_bar.as_ref().map(ProgressBar::position), Some(42));
        reporter.completed();
        assert_eq!(reporter.progress_bar.as_ref().map(ProgressBar::position), Some(100));
        reporter.finish_document();
        assert!(reporter.progress_bar.is_none());
    }
}
