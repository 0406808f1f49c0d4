//! Analysis service factory
//!
//! Creates the backend client from resolved configuration.

use crate::api::{AnalysisService, HttpAnalysisService};
use crate::config::ClientConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create an analysis service from configuration
pub fn create_analysis_service(config: &ClientConfig) -> Result<Arc<dyn AnalysisService>> {
    Ok(Arc::new(HttpAnalysisService::new(
        config.base_url.clone(),
        config.request_timeout,
    )?))
}
