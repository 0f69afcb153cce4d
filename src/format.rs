use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::collection::parse_timestamp_millis;
use crate::query::QueryCondition;

const DETAIL_PREVIEW: usize = 120;
const CONTEXT_BEFORE: usize = 40;

/// The few fields a text row shows for any item kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSummary<'a> {
    pub when: Option<&'a str>,
    pub badge: &'a str,
    pub title: &'a str,
    pub detail: Option<&'a str>,
}

/// Format one visible row for display.
///
/// `selected` is `None` when no selection is active, so the checkbox column
/// is left out. `highlight` picks the preview window in `detail` around the
/// first match of the free-text query.
pub fn format_row(
    id: &str,
    summary: &RowSummary<'_>,
    selected: Option<bool>,
    use_color: bool,
    highlight: Option<&QueryCondition>,
) -> String {
    let when = summary.when.map(display_timestamp).unwrap_or_else(|| "-".to_string());
    let marker = match selected {
        Some(true) => "[x] ",
        Some(false) => "[ ] ",
        None => "",
    };
    let detail = summary
        .detail
        .map(|text| preview(text, highlight, DETAIL_PREVIEW))
        .filter(|text| !text.is_empty());

    let mut line = if use_color {
        format!(
            "{marker}{} {} {} {}",
            when.bright_blue(),
            color_badge(summary.badge),
            summary.title.bold(),
            id.dimmed()
        )
    } else {
        format!("{marker}{when} [{}] {} {id}", summary.badge, summary.title)
    };

    if let Some(detail) = detail {
        line.push_str("\n  ");
        line.push_str(&detail);
    }
    line
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS` UTC when it parses, otherwise
/// unchanged.
pub fn display_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    parse_timestamp_millis(raw)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn color_badge(badge: &str) -> colored::ColoredString {
    let text = format!("[{badge}]");
    match badge {
        "critical" | "fatal" | "error" => text.bright_red().bold(),
        "high" | "warn" | "warning" => text.bright_yellow(),
        "medium" | "starting" | "paused" => text.yellow(),
        "running" | "healthy" | "success" => text.bright_green(),
        "stopped" | "unknown" | "debug" => text.dimmed(),
        _ => text.cyan(),
    }
}

/// Single-line preview of `text`, centred on the first query match when there
/// is one.
fn preview(text: &str, highlight: Option<&QueryCondition>, max_len: usize) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.len() <= max_len {
        return cleaned;
    }

    let start = highlight
        .and_then(|query| query.find_match(&cleaned))
        .map_or(0, |(pos, _)| pos.saturating_sub(CONTEXT_BEFORE));
    let start = floor_boundary(&cleaned, start);
    let end = floor_boundary(&cleaned, (start + max_len).min(cleaned.len()));

    let mut result = cleaned[start..end].to_string();
    if start > 0 {
        result = format!("...{result}");
    }
    if end < cleaned.len() {
        result.push_str("...");
    }
    result
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
