//! HTTP implementation of the analysis backend client

use crate::api::{ANALYSIS_PATH, AnalysisService, STATUS_PATH, interpret_submission, validate_url};
use crate::error::{Error, Result};
use crate::types::{AnalysisRequest, StatusResponse, Submission};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Analysis backend client using reqwest
pub struct HttpAnalysisService {
    client: Client,
    base_url: Url,
}

/// FastAPI-style error body
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl HttpAnalysisService {
    /// Create a client for the backend rooted at `base_url`
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

/// Describe a non-success response, including the backend's `detail` if any
fn describe_failure(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => format!("server returned {status}: {detail}"),
        _ => format!("server returned {status}"),
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn submit(&self, request: &AnalysisRequest) -> Result<Submission> {
        let url = validate_url(&request.url)?;
        let endpoint = self.api_url(ANALYSIS_PATH);
        debug!(%endpoint, %url, "submitting analysis request");

        let response = self
            .client
            .post(&endpoint)
            .json(&AnalysisRequest::new(url))
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Request(describe_failure(status, &body)));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| Error::Request(format!("malformed response: {e}")))?;

        let submission = interpret_submission(value)?;
        debug!(?submission, "analysis request accepted");
        Ok(submission)
    }

    async fn status(&self, task_id: &str) -> Result<StatusResponse> {
        let endpoint = self.api_url(&format!("{STATUS_PATH}/{}", urlencoding::encode(task_id)));

        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| Error::Poll(e.to_string()))?;

        let code = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Poll(e.to_string()))?;

        // A 404 carrying a status document is an ordinary `not_found` answer
        match serde_json::from_str::<StatusResponse>(&body) {
            Ok(parsed) if code.is_success() || code == StatusCode::NOT_FOUND => {
                debug!(%task_id, status = %parsed.status, "status received");
                Ok(parsed)
            }
            Err(e) if code.is_success() => {
                Err(Error::Poll(format!("malformed status response: {e}")))
            }
            _ => Err(Error::Poll(describe_failure(code, &body))),
        }
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}
