//! Plain-text console output: one table per host plus a run summary.

use crate::{RenderableHost, RenderableSummary};

/// Longest actual value shown in a table cell before it is shortened.
pub const ACTUAL_MAX_CHARS: usize = 50;

const HEADERS: [&str; 5] = ["Rule ID", "Name", "Status", "Expected", "Actual"];

/// Shorten `text` to 47 characters plus `...` when it is longer than [`ACTUAL_MAX_CHARS`].
pub fn truncate_display(text: &str) -> String {
    if text.chars().count() > ACTUAL_MAX_CHARS {
        let head: String = text.chars().take(ACTUAL_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

pub fn render_host_table(host: &RenderableHost) -> String {
    let mut out = format!("Compliance check results for {}\n", host.host);

    if let Some(error) = &host.error {
        out.push_str(&format!("{}: {}\n", host.status.label(), flatten(error)));
    }
    if host.checks.is_empty() {
        return out;
    }

    let rows: Vec<[String; 5]> = host
        .checks
        .iter()
        .map(|c| {
            [
                flatten(&c.rule_id),
                flatten(&c.rule_name),
                c.status.label().to_string(),
                flatten(&c.expected),
                truncate_display(&flatten(&c.actual)),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("-+-").as_str());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&format!(
        "PASS: {}, FAIL: {}, ERROR: {}\n",
        host.passed, host.failed, host.errored
    ));
    out
}

pub fn render_summary(summary: &RenderableSummary) -> String {
    let mut out = String::new();
    out.push_str("Summary\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str(&format!("Hosts:             {}\n", summary.hosts_total));
    out.push_str(&format!("Completed:         {}\n", summary.hosts_completed));
    out.push_str(&format!("Connection failed: {}\n", summary.hosts_connection_failed));
    out.push_str(&format!("Unexpected error:  {}\n", summary.hosts_unexpected_error));
    if summary.checks_total > 0 {
        out.push('\n');
        out.push_str(&format!("Checks:            {}\n", summary.checks_total));
        out.push_str(&format!("Passed:            {}\n", summary.checks_passed));
        out.push_str(&format!("Failed:            {}\n", summary.checks_failed));
        out.push_str(&format!("Errored:           {}\n", summary.checks_errored));
        out.push_str(&format!("Pass rate:         {:.1}%\n", summary.pass_rate));
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
