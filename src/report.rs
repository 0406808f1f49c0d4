//! Plain-text rendering of analysis results

use crate::types::{AnalysisResult, Insights};
use serde_json::Value;

/// Render a result as plain text, one section per field present
pub fn render_result(result: &AnalysisResult) -> String {
    let mut sections = Vec::new();

    let mut styles: Vec<&str> = Vec::new();
    let mut themes: Vec<&str> = Vec::new();
    let mut text = None;
    let mut conclusion = None;
    let mut other: Vec<(&String, &Value)> = result.extra.iter().collect();
    if let Some(style) = &result.writing_style {
        styles.extend(style.items());
    }
    if let Some(list) = &result.key_themes {
        themes.extend(list.items());
    }
    match &result.insights {
        Some(Insights::Structured(block)) => {
            styles.extend(block.writing_style.iter().map(String::as_str));
            themes.extend(block.key_themes.iter().map(String::as_str));
            conclusion = block.conclusion.as_deref();
            other.extend(block.extra.iter());
        }
        Some(Insights::Text(body)) => text = Some(body.as_str()),
        None => {}
    }

    if !styles.is_empty() {
        sections.push(bullet_section("Writing Style", &styles));
    }
    if !themes.is_empty() {
        sections.push(bullet_section("Key Themes", &themes));
    }

    let mut facts = Vec::new();
    if let Some(sentiment) = &result.sentiment {
        facts.push(format!("Sentiment: {sentiment}"));
    }
    if let Some(score) = result.readability_score {
        facts.push(format!("Readability: {score:.1}"));
    }
    if let Some(count) = result.post_count {
        facts.push(format!("Posts Analyzed: {count}"));
    }
    if !facts.is_empty() {
        sections.push(facts.join("\n"));
    }

    if let Some(body) = text.filter(|t| !t.trim().is_empty()) {
        sections.push(text_section("Insights", body));
    }
    if let Some(body) = conclusion {
        sections.push(text_section("Conclusion", body));
    }

    if !other.is_empty() {
        let lines: Vec<String> = other
            .into_iter()
            .map(|(key, value)| format!("  {key}: {}", display_value(value)))
            .collect();
        sections.push(format!("Other\n{}", lines.join("\n")));
    }

    if sections.is_empty() {
        return "No analysis fields were returned.".to_string();
    }
    sections.join("\n\n")
}

fn bullet_section(title: &str, items: &[&str]) -> String {
    let lines: Vec<String> = items.iter().map(|item| format!("  - {item}")).collect();
    format!("{title}\n{}", lines.join("\n"))
}

fn text_section(title: &str, body: &str) -> String {
    let lines: Vec<String> = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("  {}", line.trim()))
        .collect();
    format!("{title}\n{}", lines.join("\n"))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
