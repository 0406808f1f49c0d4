//! Status poll loop
//!
//! Follows a queued job until the backend reports a terminal status or the
//! attempt budget runs out:
//! 1. Query - ask the status endpoint about the task
//! 2. Transition - fold the answer into the [`AnalysisJob`](crate::types::AnalysisJob)
//! 3. Wait - sleep for the poll interval, unless cancelled

mod cancel;
mod execute;
mod progress;
mod state;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use execute::poll_until_complete;
pub use progress::{NoopProgress, ProgressCallback};
pub use state::{estimate_progress, Step, DEFAULT_ERROR_MESSAGE};
