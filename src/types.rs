//! Core types for writer-insight

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Body of the job-creation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// URL of the blog or article to analyze
    pub url: String,
}

impl AnalysisRequest {
    /// Create a request for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Status string as sent by the backend
///
/// Unknown values are preserved so they can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WireStatus {
    /// Job still running
    Processing,
    /// Job finished with a result
    Completed,
    /// Job failed on the backend
    Error,
    /// Backend does not know the task id
    NotFound,
    /// Anything else the backend sent
    Unknown(String),
}

impl From<String> for WireStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "error" => Self::Error,
            "not_found" => Self::NotFound,
            _ => Self::Unknown(value),
        }
    }
}

impl From<WireStatus> for String {
    fn from(value: WireStatus) -> Self {
        match value {
            WireStatus::Processing => "processing".to_string(),
            WireStatus::Completed => "completed".to_string(),
            WireStatus::Error => "error".to_string(),
            WireStatus::NotFound => "not_found".to_string(),
            WireStatus::Unknown(s) => s,
        }
    }
}

impl fmt::Display for WireStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
            Self::NotFound => write!(f, "not_found"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}

/// Client-side job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for the backend
    Processing,
    /// Result received
    Completed,
    /// Backend reported a failure
    Error,
    /// Backend does not know the task
    NotFound,
    /// Attempt budget exhausted (never sent by the backend)
    TimedOut,
}

impl JobStatus {
    /// Whether no further polling can change this status
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
            Self::NotFound => write!(f, "not found"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// A field the backend sends either as one string or as a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    /// Single text value
    Text(String),
    /// List of values
    List(Vec<String>),
}

impl TextOrList {
    /// Borrow the values as a list
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::Text(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// Structured insights block
///
/// Style and theme entries may arrive as one string or as a list. Keys
/// outside the known three are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct StructuredInsights {
    /// Observations about the writing style
    pub writing_style: Vec<String>,
    /// Recurring themes
    pub key_themes: Vec<String>,
    /// Closing summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    /// Fields not covered above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for StructuredInsights {
    fn from(mut fields: Map<String, Value>) -> Self {
        let into_list = |list: TextOrList| -> Vec<String> {
            match list {
                TextOrList::Text(s) => vec![s],
                TextOrList::List(items) => items,
            }
        };
        Self {
            writing_style: take_field(&mut fields, "writing_style")
                .map(into_list)
                .unwrap_or_default(),
            key_themes: take_field(&mut fields, "key_themes")
                .map(into_list)
                .unwrap_or_default(),
            conclusion: take_field(&mut fields, "conclusion"),
            extra: fields,
        }
    }
}

/// Insights as free text or as a structured block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insights {
    /// Object with style, themes and conclusion
    Structured(StructuredInsights),
    /// Free text (one paragraph per analyzed post)
    Text(String),
}

/// Field names that mark a JSON object as an analysis result
pub const RESULT_FIELDS: &[&str] = &[
    "insights",
    "writing_style",
    "key_themes",
    "readability_score",
    "sentiment",
    "post_count",
];

/// Analysis output returned by the backend
///
/// The backend never settled on a fixed shape, so every known field is
/// optional and anything unrecognized lands in `extra`. A known field with
/// an unexpected type also stays in `extra` rather than failing the whole
/// document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct AnalysisResult {
    /// Insights text or block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Insights>,
    /// Dominant writing style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_style: Option<TextOrList>,
    /// Key themes across posts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_themes: Option<TextOrList>,
    /// Average readability score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability_score: Option<f64>,
    /// Dominant sentiment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Number of posts analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<u64>,
    /// Fields not covered above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for AnalysisResult {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            insights: take_field(&mut fields, "insights"),
            writing_style: take_field(&mut fields, "writing_style"),
            key_themes: take_field(&mut fields, "key_themes"),
            readability_score: take_field(&mut fields, "readability_score"),
            sentiment: take_field(&mut fields, "sentiment"),
            post_count: take_count(&mut fields, "post_count"),
            extra: fields,
        }
    }
}

/// Remove `key` from `fields` if it parses as `T`
///
/// Nulls are dropped. Values of the wrong type are left in place.
fn take_field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    if value.is_null() {
        fields.remove(key);
        return None;
    }
    match T::deserialize(value) {
        Ok(parsed) => {
            fields.remove(key);
            Some(parsed)
        }
        Err(e) => {
            debug!(field = key, error = %e, "keeping mistyped result field as extra");
            None
        }
    }
}

/// Like [`take_field`], also accepting whole floats such as `3.0`
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn take_count(fields: &mut Map<String, Value>, key: &str) -> Option<u64> {
    let whole = fields.get(key).and_then(|value| {
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64)
                .map(|n| n as u64)
        })
    });
    if whole.is_some() {
        fields.remove(key);
        return whole;
    }
    take_field(fields, key)
}

/// Outcome of the job-creation request
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Job accepted; poll with this non-empty task id
    Queued(String),
    /// Backend answered immediately (already analyzed URL)
    Cached(AnalysisResult),
}

/// Body of a status query response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Reported status
    pub status: WireStatus,
    /// Reported progress; only honored when it is a JSON number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Value>,
    /// Result, present once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    /// Error or informational message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    /// Create a response with only a status
    pub const fn with_status(status: WireStatus) -> Self {
        Self {
            status,
            progress: None,
            result: None,
            message: None,
        }
    }

    /// Progress value when the backend sent a number
    pub fn numeric_progress(&self) -> Option<f64> {
        self.progress.as_ref().and_then(Value::as_f64)
    }
}

/// A submitted analysis job as tracked by the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisJob {
    /// Backend task id
    pub task_id: String,
    /// URL being analyzed
    pub url: String,
    /// Current status
    pub status: JobStatus,
    /// Progress percentage (0..=100)
    pub progress: u8,
    /// Result once completed
    pub result: Option<AnalysisResult>,
    /// Error message once failed
    pub message: Option<String>,
    /// Status queries issued so far
    pub attempts: u32,
    /// When the job was submitted
    pub started_at: DateTime<Utc>,
    /// When the job last changed
    pub updated_at: DateTime<Utc>,
}

impl AnalysisJob {
    /// Start tracking a freshly queued job
    pub fn new(task_id: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.into(),
            url: url.into(),
            status: JobStatus::Processing,
            progress: 0,
            result: None,
            message: None,
            attempts: 0,
            started_at: now,
            updated_at: now,
        }
    }
}
