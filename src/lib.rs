//! writer-insight - writing-style analysis client
//!
//! Submits a blog URL to a remote analysis backend, follows the resulting
//! job through its status endpoint and exposes the returned insights.
//!
//! The moving parts:
//! - [`api`]: the HTTP submission/status client behind [`api::AnalysisService`]
//! - [`poll`]: the status poll loop, progress reporting and cancellation
//! - [`session`]: one active job at a time, superseding older ones
//! - [`config`]: base URL and poll settings, resolved once at startup

pub mod api;
pub mod config;
pub mod error;
pub mod poll;
pub mod report;
pub mod session;
pub mod types;
