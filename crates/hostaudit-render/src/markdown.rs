use crate::{RenderableHost, RenderableHostStatus, RenderableReport};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str("# Hostaudit report\n\n");
    out.push_str(&format!(
        "- Hosts: {} (completed {}, connection failed {}, unexpected error {})\n",
        s.hosts_total, s.hosts_completed, s.hosts_connection_failed, s.hosts_unexpected_error
    ));
    out.push_str(&format!(
        "- Checks: {} (pass {}, fail {}, error {})\n",
        s.checks_total, s.checks_passed, s.checks_failed, s.checks_errored
    ));
    out.push_str(&format!("- Pass rate: {:.1}%\n", s.pass_rate));

    if report.hosts.is_empty() {
        out.push_str("\nNo hosts audited.\n");
        return out;
    }

    for host in &report.hosts {
        out.push('\n');
        render_host(&mut out, host);
    }

    out
}

fn render_host(out: &mut String, host: &RenderableHost) {
    out.push_str(&format!("## {}\n\n", host.host));
    out.push_str(&format!("- Status: **{}**\n", host.status.label()));
    if let Some(error) = &host.error {
        out.push_str(&format!("- Error: {}\n", escape_inline(error)));
    }

    if host.status == RenderableHostStatus::ConnectionFailed {
        return;
    }
    out.push_str(&format!(
        "- PASS {} / FAIL {} / ERROR {}\n",
        host.passed, host.failed, host.errored
    ));

    if host.checks.is_empty() {
        out.push_str("\nNo checks ran.\n");
        return;
    }

    out.push_str("\n| Rule | Name | Status | Expected | Actual |\n");
    out.push_str("|---|---|---|---|---|\n");
    for c in &host.checks {
        out.push_str(&format!(
            "| `{}` | {} | {} | {} | {} |\n",
            c.rule_id,
            escape_cell(&c.rule_name),
            c.status.label(),
            escape_cell(&c.expected),
            escape_cell(&c.actual),
        ));
    }
}

fn escape_cell(text: &str) -> String {
    text.trim().replace('|', "\\|").replace('\n', "<br>")
}

fn escape_inline(text: &str) -> String {
    text.trim().replace('\n', " ")
}
