//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, web server, etc.) to follow
//! an analysis job while it is submitted and polled.

use crate::types::AnalysisJob;
use async_trait::async_trait;

/// Progress callback trait
///
/// Implement this trait to receive updates while a job runs.
/// - CLI implementations can drive a spinner
/// - Web servers can forward SSE or WebSocket messages
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called once the backend has queued the job
    async fn on_submitted(&self, job: &AnalysisJob);

    /// Called when the backend answered immediately with a stored result
    async fn on_cached(&self, url: &str);

    /// Called after each status answer that changed the job
    async fn on_progress(&self, job: &AnalysisJob);

    /// Called when the backend sent a status the client does not know
    async fn on_unknown_status(&self, job: &AnalysisJob, status: &str);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_submitted(&self, _job: &AnalysisJob) {}
    async fn on_cached(&self, _url: &str) {}
    async fn on_progress(&self, _job: &AnalysisJob) {}
    async fn on_unknown_status(&self, _job: &AnalysisJob, _status: &str) {}
    async fn on_message(&self, _message: &str) {}
}
