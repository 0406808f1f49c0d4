//! Mock analysis service and progress recorder for testing
//!
//! These are test utilities - not every test binary uses all of them.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;
use writer_insight::api::AnalysisService;
use writer_insight::error::{Error, Result};
use writer_insight::poll::ProgressCallback;
use writer_insight::types::{AnalysisJob, AnalysisRequest, StatusResponse, Submission};

use super::fixtures::processing;

/// One scripted answer from the status endpoint
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Return this response
    Respond(StatusResponse),
    /// Fail the query with a poll error
    Fail(String),
    /// Never answer
    Hang,
}

/// Scripted mock analysis service
///
/// Status answers are served in order; once the script runs out every
/// query answers `processing` without progress.
pub struct MockAnalysisService {
    base_url: Url,
    submission: Mutex<Option<Submission>>,
    submit_error: Mutex<Option<String>>,
    script: Mutex<VecDeque<Scripted>>,
    // Call tracking
    submit_calls: Mutex<Vec<String>>,
    status_calls: Mutex<Vec<String>>,
}

impl MockAnalysisService {
    /// Mock that queues jobs under `task_id`
    pub fn queued(task_id: &str) -> Self {
        Self {
            base_url: Url::parse("http://mock.test/").unwrap(),
            submission: Mutex::new(Some(Submission::Queued(task_id.to_string()))),
            submit_error: Mutex::new(None),
            script: Mutex::new(VecDeque::new()),
            submit_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the submission answer
    pub fn set_submission(&self, submission: Submission) {
        *self.submission.lock().unwrap() = Some(submission);
    }

    /// Make `submit` return a request error
    pub fn fail_submit(&self, msg: &str) {
        *self.submit_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Append status responses to the script
    pub fn script_responses(&self, responses: impl IntoIterator<Item = StatusResponse>) {
        self.script
            .lock()
            .unwrap()
            .extend(responses.into_iter().map(Scripted::Respond));
    }

    /// Append one scripted step
    pub fn script(&self, step: Scripted) {
        self.script.lock().unwrap().push_back(step);
    }

    /// URLs passed to `submit`
    pub fn submit_calls(&self) -> Vec<String> {
        self.submit_calls.lock().unwrap().clone()
    }

    /// Task ids passed to `status`
    pub fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn submit(&self, request: &AnalysisRequest) -> Result<Submission> {
        self.submit_calls.lock().unwrap().push(request.url.clone());

        if let Some(msg) = self.submit_error.lock().unwrap().as_ref() {
            return Err(Error::Request(msg.clone()));
        }

        Ok(self
            .submission
            .lock()
            .unwrap()
            .clone()
            .expect("mock submission configured"))
    }

    async fn status(&self, task_id: &str) -> Result<StatusResponse> {
        self.status_calls.lock().unwrap().push(task_id.to_string());

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(msg)) => Err(Error::Poll(msg)),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(processing(None)),
        }
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Progress callback that records everything it is told
#[derive(Default)]
pub struct RecordingProgress {
    submitted: Mutex<Vec<String>>,
    cached: Mutex<Vec<String>>,
    progress: Mutex<Vec<u8>>,
    unknown: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    /// Task ids reported as submitted
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    /// URLs answered from a stored analysis
    pub fn cached(&self) -> Vec<String> {
        self.cached.lock().unwrap().clone()
    }

    /// Progress values in the order reported
    pub fn progress(&self) -> Vec<u8> {
        self.progress.lock().unwrap().clone()
    }

    /// Unknown statuses reported
    pub fn unknown(&self) -> Vec<String> {
        self.unknown.lock().unwrap().clone()
    }

    /// General messages reported
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_submitted(&self, job: &AnalysisJob) {
        self.submitted.lock().unwrap().push(job.task_id.clone());
    }

    async fn on_cached(&self, url: &str) {
        self.cached.lock().unwrap().push(url.to_string());
    }

    async fn on_progress(&self, job: &AnalysisJob) {
        self.progress.lock().unwrap().push(job.progress);
    }

    async fn on_unknown_status(&self, _job: &AnalysisJob, status: &str) {
        self.unknown.lock().unwrap().push(status.to_string());
    }

    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
