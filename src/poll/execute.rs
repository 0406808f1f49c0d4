//! Poll loop execution

use crate::api::AnalysisService;
use crate::config::PollSettings;
use crate::error::{Error, Result};
use crate::poll::{CancelToken, ProgressCallback, Step};
use crate::types::{AnalysisJob, AnalysisResult};
use tracing::{debug, warn};

/// Poll the status endpoint until `job` reaches a terminal status
///
/// Issues at most `settings.max_attempts` status queries and sleeps
/// `settings.interval` between them (not after the last one). A failed
/// status query ends the loop at once. Cancellation is honored while a
/// query is in flight and while sleeping.
pub async fn poll_until_complete(
    service: &dyn AnalysisService,
    job: &mut AnalysisJob,
    settings: &PollSettings,
    progress: &dyn ProgressCallback,
    cancel: &CancelToken,
) -> Result<AnalysisResult> {
    debug!(
        task_id = %job.task_id,
        max_attempts = settings.max_attempts,
        interval_ms = settings.interval.as_millis(),
        "polling for results"
    );

    while job.attempts < settings.max_attempts {
        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            response = service.status(&job.task_id) => response,
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                job.fail(&e.to_string());
                return Err(e);
            }
        };

        match job.apply(response, settings.max_attempts)? {
            Step::Completed => {
                progress.on_progress(job).await;
                return Ok(job.result.clone().unwrap_or_default());
            }
            Step::Continue => progress.on_progress(job).await,
            Step::Unrecognized(status) => progress.on_unknown_status(job, &status).await,
        }

        if job.attempts < settings.max_attempts {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Error::Cancelled),
                () = tokio::time::sleep(settings.interval) => {}
            }
        }
    }

    job.mark_timed_out();
    warn!(task_id = %job.task_id, attempts = job.attempts, "analysis timed out");
    Err(Error::Timeout {
        attempts: job.attempts,
    })
}
