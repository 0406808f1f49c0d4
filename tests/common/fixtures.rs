//! Test data factories for writer-insight types
//!
//! These are test utilities - not every test binary uses all of them.

#![allow(dead_code)]

use serde_json::json;
use std::time::Duration;
use writer_insight::config::PollSettings;
use writer_insight::types::{AnalysisResult, StatusResponse, TextOrList, WireStatus};

/// URL used by most tests
pub const BLOG_URL: &str = "https://example.substack.com";

/// A `processing` answer, optionally with server-reported progress
pub fn processing(progress: Option<u32>) -> StatusResponse {
    StatusResponse {
        progress: progress.map(|p| json!(p)),
        ..StatusResponse::with_status(WireStatus::Processing)
    }
}

/// A `completed` answer carrying `result`
pub fn completed(result: AnalysisResult) -> StatusResponse {
    StatusResponse {
        result: Some(result),
        ..StatusResponse::with_status(WireStatus::Completed)
    }
}

/// An `error` answer with a message
pub fn failed(message: &str) -> StatusResponse {
    StatusResponse {
        message: Some(message.to_string()),
        ..StatusResponse::with_status(WireStatus::Error)
    }
}

/// An answer with a status string the client does not know
pub fn unknown(status: &str) -> StatusResponse {
    StatusResponse::with_status(WireStatus::Unknown(status.to_string()))
}

/// A typical completed analysis
pub fn sample_result() -> AnalysisResult {
    AnalysisResult {
        writing_style: Some(TextOrList::Text("Conversational".to_string())),
        key_themes: Some(TextOrList::List(vec![
            "productivity".to_string(),
            "habits".to_string(),
        ])),
        readability_score: Some(64.3),
        sentiment: Some("positive".to_string()),
        post_count: Some(5),
        ..Default::default()
    }
}

/// Poll settings that never wait between attempts
pub const fn instant_settings(max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::ZERO,
        max_attempts,
    }
}
