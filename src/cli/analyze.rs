//! Analyze command - submit a URL and follow the job to completion

use crate::cli::progress::CliProgress;
use crate::cli::style::{check, hyperlink_url, Stream, Stylize};
use anstream::println;
use anyhow::{Context, Result};
use dialoguer::Input;
use writer_insight::api::create_analysis_service;
use writer_insight::config::ClientConfig;
use writer_insight::error::Error;
use writer_insight::report::render_result;
use writer_insight::session::{AnalysisOutcome, AnalysisSession};

/// Run the analyze command
///
/// Prompts for the URL when none is given. Ctrl-C cancels the job.
pub async fn run_analyze(config: &ClientConfig, url: Option<&str>, json: bool) -> Result<()> {
    let url = match url {
        Some(url) => url.to_string(),
        None => prompt_url()?,
    };

    let service = create_analysis_service(config)?;
    let session = AnalysisSession::new(service, config.poll);

    let progress = CliProgress::start(&format!("Submitting {url}..."));
    let outcome = tokio::select! {
        outcome = session.analyze(&url, &progress) => outcome,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            Err(Error::Cancelled)
        }
    };
    progress.finish();

    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
        return Ok(());
    }

    print_outcome(&url, &outcome);
    Ok(())
}

fn prompt_url() -> Result<String> {
    let url: String = Input::new()
        .with_prompt("Enter your Substack or Medium URL")
        .interact_text()
        .context("no URL given; pass one as an argument or run in a terminal")?;
    Ok(url)
}

fn print_outcome(url: &str, outcome: &AnalysisOutcome) {
    println!(
        "{} {} {}",
        check(),
        "Analysis Results".emphasis(),
        hyperlink_url(Stream::Stdout, url).muted()
    );
    println!();
    println!("{}", render_result(&outcome.result));
    println!();

    match &outcome.job {
        Some(job) => {
            let elapsed = job.updated_at - job.started_at;
            println!(
                "{}",
                format!(
                    "task {} - {} status checks in {}s",
                    job.task_id,
                    job.attempts,
                    elapsed.num_seconds()
                )
                .muted()
            );
        }
        None => println!("{}", "served from a previous analysis".muted()),
    }
}
