//! Config command - show the resolved configuration

use crate::cli::style::{hyperlink_url, Stream, Stylize};
use anstream::println;
use writer_insight::api::{ANALYSIS_PATH, STATUS_PATH};
use writer_insight::config::{
    ClientConfig, API_URL_ENV, CONFIG_URL_ENV, MAX_ATTEMPTS_ENV, POLL_INTERVAL_ENV,
};

/// Run the config command
pub fn run_config(config: &ClientConfig) {
    let base = config.base_url.as_str().trim_end_matches('/');

    println!("{}", "Backend".emphasis());
    println!(
        "  Base URL:  {} {}",
        hyperlink_url(Stream::Stdout, base).accent(),
        format!("({})", config.base_url_source).muted()
    );
    println!("  Submit:    POST {base}{ANALYSIS_PATH}");
    println!("  Status:    GET  {base}{STATUS_PATH}/{{task_id}}");
    println!();
    println!("{}", "Polling".emphasis());
    println!("  Interval:      {}s", config.poll.interval.as_secs());
    println!("  Max attempts:  {}", config.poll.max_attempts);
    println!("  Timeout:       {}s per request", config.request_timeout.as_secs());
    println!();
    println!("{}", "Environment".emphasis());
    for name in [API_URL_ENV, CONFIG_URL_ENV, POLL_INTERVAL_ENV, MAX_ATTEMPTS_ENV] {
        println!("  {}", name.muted());
    }
}
