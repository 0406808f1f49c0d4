//! Analysis session
//!
//! Holds the single active-job slot. Starting a new analysis cancels the
//! poll loop of the job it replaces, so two jobs never race to report
//! results.

use crate::api::{validate_url, AnalysisService};
use crate::config::PollSettings;
use crate::error::{Error, Result};
use crate::poll::{cancel_pair, poll_until_complete, CancelHandle, CancelToken, ProgressCallback};
use crate::types::{AnalysisJob, AnalysisRequest, AnalysisResult, Submission};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Result of a finished analysis
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Task id, absent when the backend answered immediately
    pub task_id: Option<String>,
    /// Analysis result
    pub result: AnalysisResult,
    /// Final job state, absent when the backend answered immediately
    pub job: Option<AnalysisJob>,
}

struct ActiveJob {
    generation: u64,
    handle: CancelHandle,
}

/// Session running at most one analysis job at a time
pub struct AnalysisSession {
    service: Arc<dyn AnalysisService>,
    settings: PollSettings,
    active: Mutex<Option<ActiveJob>>,
    next_generation: AtomicU64,
}

/// Clears the active slot when its job ends, however it ends
struct ActiveGuard<'a> {
    session: &'a AnalysisSession,
    generation: u64,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.session.lock_active();
        if active
            .as_ref()
            .is_some_and(|job| job.generation == self.generation)
        {
            *active = None;
        }
    }
}

impl AnalysisSession {
    /// Create a session over `service`
    pub fn new(service: Arc<dyn AnalysisService>, settings: PollSettings) -> Self {
        Self {
            service,
            settings,
            active: Mutex::new(None),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Poll settings used for every job
    pub const fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Submit `url` and follow the job to completion
    ///
    /// Any job already running in this session is cancelled first and
    /// resolves with [`Error::Cancelled`].
    pub async fn analyze(
        &self,
        url: &str,
        progress: &dyn ProgressCallback,
    ) -> Result<AnalysisOutcome> {
        let url = validate_url(url)?;
        let (guard, token, superseded) = self.begin();
        if superseded {
            progress
                .on_message("Previous analysis cancelled in favor of this one")
                .await;
        }
        let outcome = self.run(&url, progress, &token).await;
        drop(guard);
        outcome
    }

    /// Cancel the active job, returning whether there was one
    pub fn cancel(&self) -> bool {
        self.lock_active().take().is_some_and(|job| {
            debug!(generation = job.generation, "cancelling active analysis");
            job.handle.cancel();
            true
        })
    }

    /// Whether a job is in flight
    pub fn is_active(&self) -> bool {
        self.lock_active().is_some()
    }

    fn begin(&self) -> (ActiveGuard<'_>, CancelToken, bool) {
        let (handle, token) = cancel_pair();
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);

        let previous = self
            .lock_active()
            .replace(ActiveJob { generation, handle });
        let superseded = previous.is_some();
        if let Some(previous) = previous {
            debug!(
                superseded = previous.generation,
                generation, "new submission supersedes in-flight analysis"
            );
            previous.handle.cancel();
        }

        (
            ActiveGuard {
                session: self,
                generation,
            },
            token,
            superseded,
        )
    }

    async fn run(
        &self,
        url: &str,
        progress: &dyn ProgressCallback,
        token: &CancelToken,
    ) -> Result<AnalysisOutcome> {
        let request = AnalysisRequest::new(url);
        let submission = tokio::select! {
            biased;
            () = token.cancelled() => return Err(Error::Cancelled),
            submission = self.service.submit(&request) => submission?,
        };

        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        match submission {
            Submission::Cached(result) => {
                progress.on_cached(url).await;
                Ok(AnalysisOutcome {
                    task_id: None,
                    result,
                    job: None,
                })
            }
            Submission::Queued(task_id) => {
                let mut job = AnalysisJob::new(task_id.clone(), url);
                progress.on_submitted(&job).await;

                let result = poll_until_complete(
                    &*self.service,
                    &mut job,
                    &self.settings,
                    progress,
                    token,
                )
                .await?;

                Ok(AnalysisOutcome {
                    task_id: Some(task_id),
                    result,
                    job: Some(job),
                })
            }
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveJob>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
