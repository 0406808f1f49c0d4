//! CLI progress callback with a spinner

use crate::cli::style::{spinner_style, Stylize};
use anstream::eprintln;
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::time::Duration;
use writer_insight::poll::ProgressCallback;
use writer_insight::types::AnalysisJob;

/// Spinner-backed progress reporting for `insight analyze`
///
/// The spinner draws to stderr and hides itself when stderr is not a
/// terminal, so piped output stays clean.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Start a spinner with an initial message
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Print a line to stderr above the spinner
    ///
    /// Unlike `ProgressBar::println`, this still prints when the spinner is
    /// hidden.
    fn notice(&self, line: &str) {
        self.bar.suspend(|| eprintln!("{line}"));
    }

    /// Remove the spinner from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_submitted(&self, job: &AnalysisJob) {
        self.bar.set_message(format!(
            "Analysis queued as task {}. This may take a few minutes...",
            job.task_id.accent()
        ));
    }

    async fn on_cached(&self, url: &str) {
        self.bar
            .set_message(format!("Using stored analysis for {}", url.accent()));
    }

    async fn on_progress(&self, job: &AnalysisJob) {
        let percent = format!("{}%", job.progress);
        self.bar.set_message(format!(
            "Analysis in progress: {} complete {}",
            percent.accent(),
            format!("(check {})", job.attempts).muted()
        ));
    }

    async fn on_unknown_status(&self, job: &AnalysisJob, status: &str) {
        let note = format!("Unknown status '{status}' for task {}, still waiting", job.task_id);
        self.notice(&note.warn().to_string());
    }

    async fn on_message(&self, message: &str) {
        self.notice(&message.muted().for_stderr().to_string());
    }
}
