//! Render use cases: markdown, HTML, and console output from in-memory reports.

use hostaudit_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    hostaudit_render::render_markdown(report)
}

pub fn render_html(report: &RenderableReport) -> String {
    hostaudit_render::render_html(report)
}

/// Every host table followed by the run summary, separated by blank lines.
pub fn render_console(report: &RenderableReport) -> String {
    let mut sections: Vec<String> = report
        .hosts
        .iter()
        .map(hostaudit_render::render_host_table)
        .collect();
    sections.push(hostaudit_render::render_summary(&report.summary));
    sections.join("\n")
}
