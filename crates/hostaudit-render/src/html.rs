//! Standalone HTML report: run summary, a fleet-wide table of failed checks, and one section
//! per host. All report text is escaped; the page loads nothing external.

use crate::{RenderableCheckStatus, RenderableHost, RenderableHostStatus, RenderableReport};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; vertical-align: top; }
td { white-space: pre-wrap; }
.PASS { color: #1a7f37; }
.FAIL { color: #cf222e; }
.ERROR { color: #9a6700; }
";

pub fn render_html(report: &RenderableReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Hostaudit report</title>\n<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n<h1>Hostaudit report</h1>\n<ul>\n");
    out.push_str(&format!(
        "<li>Hosts: {} (completed {}, connection failed {}, unexpected error {})</li>\n",
        s.hosts_total, s.hosts_completed, s.hosts_connection_failed, s.hosts_unexpected_error
    ));
    out.push_str(&format!(
        "<li>Checks: {} (pass {}, fail {}, error {})</li>\n",
        s.checks_total, s.checks_passed, s.checks_failed, s.checks_errored
    ));
    out.push_str(&format!("<li>Pass rate: {:.1}%</li>\n</ul>\n", s.pass_rate));

    render_failed_checks(&mut out, report);
    for host in &report.hosts {
        render_host(&mut out, host);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_failed_checks(out: &mut String, report: &RenderableReport) {
    out.push_str("<h2>Failed checks</h2>\n");

    let failed: Vec<_> = report
        .hosts
        .iter()
        .flat_map(|h| h.checks.iter().map(move |c| (h, c)))
        .filter(|(_, c)| c.status == RenderableCheckStatus::Fail)
        .collect();
    if failed.is_empty() {
        out.push_str("<p>No failed checks.</p>\n");
        return;
    }

    out.push_str("<table>\n");
    out.push_str(
        "<tr><th>Host</th><th>Rule</th><th>Name</th><th>Expected</th><th>Actual</th></tr>\n",
    );
    for (host, c) in failed {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&host.host),
            escape(&c.rule_id),
            escape(&c.rule_name),
            escape(&c.expected),
            escape(&c.actual),
        ));
    }
    out.push_str("</table>\n");
}

fn render_host(out: &mut String, host: &RenderableHost) {
    out.push_str(&format!("<h2>{}</h2>\n", escape(&host.host)));
    out.push_str(&format!(
        "<p>Status: <strong>{}</strong></p>\n",
        host.status.label()
    ));
    if let Some(error) = &host.error {
        out.push_str(&format!("<p>Error: {}</p>\n", escape(error.trim())));
    }

    if host.status == RenderableHostStatus::ConnectionFailed {
        return;
    }
    out.push_str(&format!(
        "<p>PASS {} / FAIL {} / ERROR {}</p>\n",
        host.passed, host.failed, host.errored
    ));

    if host.checks.is_empty() {
        out.push_str("<p>No checks ran.</p>\n");
        return;
    }

    out.push_str("<table>\n");
    out.push_str(
        "<tr><th>Rule</th><th>Name</th><th>Status</th><th>Expected</th><th>Actual</th></tr>\n",
    );
    for c in &host.checks {
        let status = c.status.label();
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"{status}\">{status}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&c.rule_id),
            escape(&c.rule_name),
            escape(&c.expected),
            escape(&c.actual),
        ));
    }
    out.push_str("</table>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, sample_report};
    use crate::RenderableSummary;

    fn body(html: &str) -> &str {
        let start = html.find("<body>").expect("body");
        &html[start..]
    }

    #[test]
    fn renders_failed_table_and_host_sections() {
        let html = render_html(&sample_report());
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        insta::assert_snapshot!(body(&html), @r#"
        <body>
        <h1>Hostaudit report</h1>
        <ul>
        <li>Hosts: 2 (completed 1, connection failed 1, unexpected error 0)</li>
        <li>Checks: 2 (pass 1, fail 1, error 0)</li>
        <li>Pass rate: 50.0%</li>
        </ul>
        <h2>Failed checks</h2>
        <table>
        <tr><th>Host</th><th>Rule</th><th>Name</th><th>Expected</th><th>Actual</th></tr>
        <tr><td>web-1</td><td>5.2.7</td><td>rule 5.2.7</td><td>4</td><td>6 (&lt;= 4)</td></tr>
        </table>
        <h2>web-1</h2>
        <p>Status: <strong>completed</strong></p>
        <p>PASS 1 / FAIL 1 / ERROR 0</p>
        <table>
        <tr><th>Rule</th><th>Name</th><th>Status</th><th>Expected</th><th>Actual</th></tr>
        <tr><td>5.2.8</td><td>rule 5.2.8</td><td class="PASS">PASS</td><td>yes</td><td>permitrootlogin no</td></tr>
        <tr><td>5.2.7</td><td>rule 5.2.7</td><td class="FAIL">FAIL</td><td>4</td><td>6 (&lt;= 4)</td></tr>
        </table>
        <h2>db-1</h2>
        <p>Status: <strong>connection failed</strong></p>
        <p>Error: connection to db-1 timed out after 10s</p>
        </body>
        </html>
        "#);
    }

    #[test]
    fn escapes_markup_in_report_text() {
        let mut report = sample_report();
        report.hosts[0].host = "<web-1>".to_string();
        report.hosts[0].checks = vec![check(
            "6.1",
            RenderableCheckStatus::Fail,
            "a & b",
            "<script>alert('x')</script>",
        )];
        let html = render_html(&report);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
        assert!(html.contains("<h2>&lt;web-1&gt;</h2>"));
        assert!(html.contains("<td>a &amp; b</td>"));
    }

    #[test]
    fn clean_run_has_no_failed_table() {
        let report = RenderableReport {
            hosts: Vec::new(),
            summary: RenderableSummary::default(),
        };
        let html = render_html(&report);
        assert!(html.contains("<p>No failed checks.</p>"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }
}
