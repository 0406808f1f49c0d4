//! Status command - query a job once

use crate::cli::style::{cross, Stylize};
use anstream::println;
use anyhow::Result;
use writer_insight::api::create_analysis_service;
use writer_insight::config::ClientConfig;
use writer_insight::report::render_result;
use writer_insight::types::WireStatus;

/// Run the status command
pub async fn run_status(config: &ClientConfig, task_id: &str, json: bool) -> Result<()> {
    let service = create_analysis_service(config)?;
    let response = service.status(task_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Task:   {}", task_id.accent());
    println!("Server: {}", service.base_url().as_str().muted());
    match &response.status {
        WireStatus::Completed => println!("Status: {}", "completed".success()),
        WireStatus::Error | WireStatus::NotFound => {
            println!("Status: {} {}", cross().for_stdout(), response.status.error().for_stdout());
        }
        WireStatus::Processing => println!("Status: {}", "processing".accent()),
        WireStatus::Unknown(other) => println!("Status: {}", other.warn().for_stdout()),
    }

    if let Some(progress) = response.numeric_progress() {
        println!("Progress: {progress:.0}%");
    }
    if let Some(message) = &response.message {
        println!("Message: {message}");
    }
    if let Some(result) = &response.result {
        println!();
        println!("{}", render_result(result));
    }

    Ok(())
}
