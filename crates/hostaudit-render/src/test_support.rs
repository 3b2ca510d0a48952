use crate::{
    RenderableCheck, RenderableCheckStatus, RenderableHost, RenderableHostStatus,
    RenderableReport, RenderableSummary,
};

pub fn check(id: &str, status: RenderableCheckStatus, expected: &str, actual: &str) -> RenderableCheck {
    RenderableCheck {
        rule_id: id.to_string(),
        rule_name: format!("rule {id}"),
        status,
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

pub fn sample_report() -> RenderableReport {
    RenderableReport {
        hosts: vec![
            RenderableHost {
                host: "web-1".to_string(),
                status: RenderableHostStatus::Completed,
                error: None,
                checks: vec![
                    check("5.2.8", RenderableCheckStatus::Pass, "yes", "permitrootlogin no"),
                    check("5.2.7", RenderableCheckStatus::Fail, "4", "6 (<= 4)"),
                ],
                passed: 1,
                failed: 1,
                errored: 0,
            },
            RenderableHost {
                host: "db-1".to_string(),
                status: RenderableHostStatus::ConnectionFailed,
                error: Some("connection to db-1 timed out after 10s".to_string()),
                checks: Vec::new(),
                passed: 0,
                failed: 0,
                errored: 0,
            },
        ],
        summary: RenderableSummary {
            hosts_total: 2,
            hosts_completed: 1,
            hosts_connection_failed: 1,
            hosts_unexpected_error: 0,
            checks_total: 2,
            checks_passed: 1,
            checks_failed: 1,
            checks_errored: 0,
            pass_rate: 50.0,
        },
    }
}
