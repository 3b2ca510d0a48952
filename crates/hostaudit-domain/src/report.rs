use hostaudit_types::{CheckVerdict, ConnectionStatus, HostReport, VerdictStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerdictCounts {
    pub pass: u32,
    pub fail: u32,
    pub error: u32,
}

impl VerdictCounts {
    pub fn from_verdicts(verdicts: &[CheckVerdict]) -> Self {
        let mut counts = VerdictCounts::default();
        for v in verdicts {
            match v.status {
                VerdictStatus::Pass => counts.pass += 1,
                VerdictStatus::Fail => counts.fail += 1,
                VerdictStatus::Error => counts.error += 1,
            }
        }
        counts
    }
}

/// Build the report of one host. Counts are derived from `verdicts` here and nowhere else.
pub fn host_report(
    host: &str,
    connection_status: ConnectionStatus,
    error: Option<String>,
    verdicts: Vec<CheckVerdict>,
) -> HostReport {
    let counts = VerdictCounts::from_verdicts(&verdicts);
    HostReport {
        host: host.to_string(),
        connection_status,
        error,
        verdicts,
        pass_count: counts.pass,
        fail_count: counts.fail,
        error_count: counts.error,
    }
}

/// Report for a host whose session could not be opened.
pub fn connection_failed(host: &str, message: impl Into<String>) -> HostReport {
    host_report(
        host,
        ConnectionStatus::ConnectionFailed,
        Some(message.into()),
        Vec::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{error_verdict, evaluate};
    use crate::test_support::{output, rule};
    use hostaudit_types::RuleKind;

    #[test]
    fn counts_follow_verdict_statuses() {
        let r = rule(RuleKind::Contains, "ok");
        let verdicts = vec![
            evaluate(&r, &output("ok")),
            evaluate(&r, &output("nope")),
            evaluate(&r, &output("ok ok")),
            error_verdict(&r, "channel closed"),
        ];
        let report = host_report("web-1", ConnectionStatus::UnexpectedError, None, verdicts);
        assert_eq!(report.pass_count, 2);
        assert_eq!(report.fail_count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.verdicts.len(), 4);
    }

    #[test]
    fn connection_failure_has_no_verdicts() {
        let report = connection_failed("db-1", "connection refused");
        assert_eq!(report.connection_status, ConnectionStatus::ConnectionFailed);
        assert!(report.verdicts.is_empty());
        assert_eq!(report.pass_count + report.fail_count + report.error_count, 0);
        assert_eq!(report.error.as_deref(), Some("connection refused"));
    }
}
