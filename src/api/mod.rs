//! Analysis backend client
//!
//! Provides the submission and status operations behind one trait, so the
//! poll loop and session work the same against the real backend or a fake.

mod factory;
mod http;

pub use factory::create_analysis_service;
pub use http::HttpAnalysisService;

use crate::error::{Error, Result};
use crate::types::{AnalysisRequest, RESULT_FIELDS, StatusResponse, Submission};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Job-creation endpoint, relative to the base URL
pub const ANALYSIS_PATH: &str = "/api/v1/analysis/";

/// Status endpoint prefix; the task id is appended as a path segment
pub const STATUS_PATH: &str = "/api/v1/analysis/status";

/// Message used when the backend answers without a task id or result
pub const MISSING_TASK_ID: &str = "No task ID received from the server";

/// Analysis backend operations
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Create an analysis job for the request URL
    ///
    /// Issues exactly one request. Never returns an empty task id.
    async fn submit(&self, request: &AnalysisRequest) -> Result<Submission>;

    /// Query the status of a job
    async fn status(&self, task_id: &str) -> Result<StatusResponse>;

    /// Backend root this service talks to
    fn base_url(&self) -> &Url;
}

/// Check that `raw` is a non-empty absolute http(s) URL, returning it trimmed
pub fn validate_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("URL must not be empty".to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("'{trimmed}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "'{trimmed}': only http and https URLs can be analyzed"
        )));
    }

    Ok(trimmed.to_string())
}

/// Turn a job-creation response body into a [`Submission`]
///
/// A non-empty `task_id` wins. Otherwise a `result` object, or a body that
/// itself carries result fields, is taken as an immediate answer.
pub fn interpret_submission(body: Value) -> Result<Submission> {
    let Value::Object(mut fields) = body else {
        return Err(Error::Request(
            "malformed response: expected a JSON object".to_string(),
        ));
    };

    let task_id = match fields.get("task_id") {
        Some(Value::String(id)) => id.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    if !task_id.is_empty() {
        return Ok(Submission::Queued(task_id));
    }

    let cached = match fields.remove("result") {
        Some(result @ Value::Object(_)) => Some(result),
        _ if RESULT_FIELDS.iter().any(|k| fields.contains_key(*k)) => {
            fields.remove("task_id");
            fields.remove("status");
            Some(Value::Object(fields))
        }
        _ => None,
    };

    match cached {
        Some(result) => serde_json::from_value(result)
            .map(Submission::Cached)
            .map_err(|e| Error::Request(format!("malformed result: {e}"))),
        None => Err(Error::Request(MISSING_TASK_ID.to_string())),
    }
}
