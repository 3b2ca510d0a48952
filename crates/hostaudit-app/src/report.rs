use anyhow::Context;
use hostaudit_render::{
    RenderableCheck, RenderableCheckStatus, RenderableHost, RenderableHostStatus,
    RenderableReport, RenderableSummary,
};
use hostaudit_types::{
    AuditReport, CheckVerdict, ConnectionStatus, HostReport, SCHEMA_REPORT_V1, VerdictStatus,
};

pub fn parse_report_json(text: &str) -> anyhow::Result<AuditReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse hostaudit report")
}

pub fn serialize_report(report: &AuditReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &AuditReport) -> RenderableReport {
    let s = &report.summary;
    RenderableReport {
        hosts: report.hosts.iter().map(renderable_host).collect(),
        summary: RenderableSummary {
            hosts_total: s.hosts_total,
            hosts_completed: s.hosts_completed,
            hosts_connection_failed: s.hosts_connection_failed,
            hosts_unexpected_error: s.hosts_unexpected_error,
            checks_total: s.checks_total,
            checks_passed: s.checks_passed,
            checks_failed: s.checks_failed,
            checks_errored: s.checks_errored,
            pass_rate: s.pass_rate(),
        },
    }
}

fn renderable_host(h: &HostReport) -> RenderableHost {
    RenderableHost {
        host: h.host.clone(),
        status: match h.connection_status {
            ConnectionStatus::Completed => RenderableHostStatus::Completed,
            ConnectionStatus::ConnectionFailed => RenderableHostStatus::ConnectionFailed,
            ConnectionStatus::UnexpectedError => RenderableHostStatus::UnexpectedError,
        },
        error: h.error.clone(),
        checks: h.verdicts.iter().map(renderable_check).collect(),
        passed: h.pass_count,
        failed: h.fail_count,
        errored: h.error_count,
    }
}

fn renderable_check(v: &CheckVerdict) -> RenderableCheck {
    RenderableCheck {
        rule_id: v.rule_id.clone(),
        rule_name: v.rule_name.clone(),
        status: match v.status {
            VerdictStatus::Pass => RenderableCheckStatus::Pass,
            VerdictStatus::Fail => RenderableCheckStatus::Fail,
            VerdictStatus::Error => RenderableCheckStatus::Error,
        },
        expected: v.expected.clone(),
        actual: v.actual_display.clone(),
    }
}
