//! Job state transitions driven by status answers

use crate::error::{Error, Result};
use crate::types::{AnalysisJob, JobStatus, StatusResponse, WireStatus};
use chrono::Utc;
use tracing::{debug, warn};

/// Message used when the backend reports an error without one
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred during analysis.";

/// What the poll loop should do after a status answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Still processing; keep polling
    Continue,
    /// Status not recognized; keep polling
    Unrecognized(String),
    /// Result stored on the job
    Completed,
}

/// Progress estimate when the backend sends none
///
/// `attempts` is the number of status checks completed before the current
/// one. Capped at 99 so only completion reports 100.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_progress(attempts: u32, max_attempts: u32) -> u8 {
    if max_attempts == 0 {
        return 0;
    }
    let percent = (f64::from(attempts) / f64::from(max_attempts) * 100.0).round();
    percent.clamp(0.0, 99.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_reported_progress(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

impl AnalysisJob {
    /// Fold one status answer into the job
    ///
    /// Terminal failures (`error`, `not_found`) update the job and come back
    /// as `Err`. Every call counts as one attempt.
    pub fn apply(&mut self, response: StatusResponse, max_attempts: u32) -> Result<Step> {
        let previous_attempts = self.attempts;
        self.attempts += 1;
        self.updated_at = Utc::now();

        match response.status {
            WireStatus::Completed => {
                self.status = JobStatus::Completed;
                self.progress = 100;
                self.result = Some(response.result.unwrap_or_default());
                debug!(task_id = %self.task_id, attempts = self.attempts, "analysis completed");
                Ok(Step::Completed)
            }
            WireStatus::Error => {
                let message = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
                self.fail(&message);
                Err(Error::Analysis(message))
            }
            WireStatus::NotFound => {
                self.status = JobStatus::NotFound;
                self.message = response.message;
                Err(Error::TaskNotFound(self.task_id.clone()))
            }
            WireStatus::Processing => {
                self.progress = response.numeric_progress().map_or_else(
                    || estimate_progress(previous_attempts, max_attempts),
                    clamp_reported_progress,
                );
                debug!(task_id = %self.task_id, progress = self.progress, "analysis processing");
                Ok(Step::Continue)
            }
            WireStatus::Unknown(status) => {
                warn!(task_id = %self.task_id, %status, "unknown status received, still polling");
                Ok(Step::Unrecognized(status))
            }
        }
    }

    /// Mark the job failed with `message`
    pub fn fail(&mut self, message: &str) {
        self.status = JobStatus::Error;
        self.message = Some(message.to_string());
        self.updated_at = Utc::now();
    }

    /// Mark the job timed out after the attempt budget ran out
    pub fn mark_timed_out(&mut self) {
        self.status = JobStatus::TimedOut;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisResult;
    use serde_json::json;

    fn processing(progress: Option<serde_json::Value>) -> StatusResponse {
        StatusResponse {
            progress,
            ..StatusResponse::with_status(WireStatus::Processing)
        }
    }

    #[test]
    fn test_estimate_progress() {
        assert_eq!(estimate_progress(0, 60), 0);
        assert_eq!(estimate_progress(30, 60), 50);
        assert_eq!(estimate_progress(1, 3), 33);
        assert_eq!(estimate_progress(2, 3), 67);
        assert_eq!(estimate_progress(59, 60), 98);
        assert_eq!(estimate_progress(60, 60), 99);
        assert_eq!(estimate_progress(5, 0), 0);
    }

    #[test]
    fn test_server_progress_takes_precedence() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        job.attempts = 30;
        let step = job.apply(processing(Some(json!(42))), 60).unwrap();
        assert_eq!(step, Step::Continue);
        assert_eq!(job.progress, 42);
        assert_eq!(job.attempts, 31);
    }

    #[test]
    fn test_reported_progress_is_clamped() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        job.apply(processing(Some(json!(140.2))), 60).unwrap();
        assert_eq!(job.progress, 100);
        job.apply(processing(Some(json!(-3))), 60).unwrap();
        assert_eq!(job.progress, 0);
        job.apply(processing(Some(json!(41.6))), 60).unwrap();
        assert_eq!(job.progress, 42);
    }

    #[test]
    fn test_non_numeric_progress_falls_back_to_estimate() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        job.attempts = 30;
        job.apply(processing(Some(json!("42"))), 60).unwrap();
        assert_eq!(job.progress, 50);
    }

    #[test]
    fn test_completed_forces_full_progress() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        job.apply(processing(Some(json!(10))), 60).unwrap();

        let response = StatusResponse {
            result: Some(AnalysisResult {
                sentiment: Some("positive".into()),
                ..Default::default()
            }),
            ..StatusResponse::with_status(WireStatus::Completed)
        };
        assert_eq!(job.apply(response, 60).unwrap(), Step::Completed);
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(
            job.result.unwrap().sentiment.as_deref(),
            Some("positive")
        );
    }

    #[test]
    fn test_error_status_surfaces_message() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        let response = StatusResponse {
            message: Some("bad URL".into()),
            ..StatusResponse::with_status(WireStatus::Error)
        };
        let err = job.apply(response, 60).unwrap_err();
        assert_eq!(err.to_string(), "bad URL");
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.message.as_deref(), Some("bad URL"));
    }

    #[test]
    fn test_error_status_without_message_uses_default() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        let err = job
            .apply(StatusResponse::with_status(WireStatus::Error), 60)
            .unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_not_found_is_terminal() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        let err = job
            .apply(StatusResponse::with_status(WireStatus::NotFound), 60)
            .unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(ref id) if id == "t1"));
        assert!(job.status.is_terminal());
    }

    #[test]
    fn test_unknown_status_keeps_polling() {
        let mut job = AnalysisJob::new("t1", "https://a.test");
        let step = job
            .apply(
                StatusResponse::with_status(WireStatus::Unknown("queued".into())),
                60,
            )
            .unwrap();
        assert_eq!(step, Step::Unrecognized("queued".to_string()));
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.attempts, 1);
    }
}
