//! Output formatting for CLI commands

use chrono::Local;
use serde::Serialize;

use crate::config::{Config, WatchedPr};

/// Max title width in the list table
pub const TITLE_WIDTH: usize = 50;

const TABLE_HEADERS: [&str; 5] = ["REPO", "PR", "STATUS", "LAST CHECKED", "TITLE"];

/// One row of `prw list --json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl From<&WatchedPr> for ListEntry {
    fn from(pr: &WatchedPr) -> Self {
        Self {
            owner: pr.owner.clone(),
            repo: pr.repo.clone(),
            number: pr.number,
            status: pr.last_known_state.label().to_string(),
            last_checked: pr.last_checked.map(|ts| ts.to_rfc3339()),
            title: Some(pr.title.clone()).filter(|t| !t.is_empty()),
        }
    }
}

/// Format output as JSON or table based on --json flag
pub fn format_list(prs: &[WatchedPr], json: bool) -> anyhow::Result<String> {
    if json {
        let entries: Vec<ListEntry> = prs.iter().map(ListEntry::from).collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    } else {
        Ok(render_table(prs))
    }
}

/// Plain-text table, columns padded to the widest cell
pub fn render_table(prs: &[WatchedPr]) -> String {
    let rows: Vec<[String; 5]> = prs
        .iter()
        .map(|pr| {
            [
                format!("{}/{}", pr.owner, pr.repo),
                format!("#{}", pr.number),
                pr.last_known_state.label().to_string(),
                pr.last_checked
                    .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string()),
                truncate_title(&pr.title, TITLE_WIDTH),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = TABLE_HEADERS.map(String::from);
    let rule = TABLE_HEADERS.map(|h| "-".repeat(h.len()));
    for row in [&header, &rule].into_iter().chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i + 1 == row.len() {
                    cell.clone()
                } else {
                    format!("{:<width$}", cell, width = widths[i])
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Titles longer than `max` chars become `max - 3` chars plus `...`
pub fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let kept: String = title.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// `prw config show`; never prints the token itself
pub fn render_config(config: &Config, path: &std::path::Path) -> String {
    let webhook = if config.webhook_url.is_empty() {
        "(not set)"
    } else {
        config.webhook_url.as_str()
    };

    let mut out = String::new();
    out.push_str(&format!("Config file:           {}\n", path.display()));
    out.push_str(&format!("poll_interval_seconds: {}\n", config.poll_interval_seconds));
    out.push_str(&format!("webhook_url:           {}\n", webhook));
    out.push_str(&format!("github_token:          {}\n", config.token_source()));
    out.push_str(&format!("notification_filter:   {}\n", config.notification_filter));
    out.push_str(&format!("api_base_url:          {}\n", config.api_base_url()));
    out.push_str(&format!("watched_prs:           {}\n", config.watched_prs.len()));
    out
}
