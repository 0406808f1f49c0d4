//! CLI commands
//!
//! Command implementations for the `insight` binary.

mod analyze;
mod config;
mod progress;
mod status;
pub mod style;

pub use analyze::run_analyze;
pub use config::run_config;
pub use status::run_status;
