//! Error types for writer-insight

use thiserror::Error;

/// Errors surfaced by submission, polling and configuration
///
/// None of these are recovered locally; the caller shows them to the user,
/// who resubmits.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL to analyze was empty or not an absolute http(s) URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Creating the analysis job failed or returned no task identifier
    #[error("analysis request failed: {0}")]
    Request(String),

    /// A status query failed or returned a malformed body
    #[error("error checking analysis status: {0}")]
    Poll(String),

    /// The backend reported `status: error`; carries its message verbatim
    #[error("{0}")]
    Analysis(String),

    /// The attempt budget ran out before a terminal status arrived
    #[error("Analysis timed out after {attempts} status checks. Please try again later.")]
    Timeout {
        /// Number of status queries issued
        attempts: u32,
    },

    /// The backend does not know the task
    #[error("analysis task not found: {0}")]
    TaskNotFound(String),

    /// The job was superseded by a newer submission or cancelled
    #[error("analysis cancelled")]
    Cancelled,

    /// Configuration could not be resolved
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
