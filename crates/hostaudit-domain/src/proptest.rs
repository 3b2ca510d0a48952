//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Numeric extraction failures classified as ERROR
//! - Determinism of every comparison
//! - Run summaries folded from host reports

use crate::engine::{error_verdict, evaluate};
use crate::report::host_report;
use crate::test_support::{output, rule};
use hostaudit_types::{ConnectionStatus, HostReport, RuleKind, RunSummary, VerdictStatus};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = RuleKind> {
    prop_oneof![
        Just(RuleKind::Text),
        Just(RuleKind::Contains),
        Just(RuleKind::NotContains),
        Just(RuleKind::ContainsMultiple),
        Just(RuleKind::FileContainsLines),
        Just(RuleKind::NumericMax),
        Just(RuleKind::NumericMin),
        Just(RuleKind::NumericEquals),
        Just(RuleKind::ListVersions),
        "[a-z_]{1,12}".prop_map(|name| RuleKind::parse(&name)),
    ]
}

fn arb_status() -> impl Strategy<Value = ConnectionStatus> {
    prop_oneof![
        Just(ConnectionStatus::Completed),
        Just(ConnectionStatus::ConnectionFailed),
        Just(ConnectionStatus::UnexpectedError),
    ]
}

/// Host report built from real verdicts so counts stay consistent.
fn arb_host_report() -> impl Strategy<Value = HostReport> {
    (
        "[a-z]{1,8}",
        arb_status(),
        prop::collection::vec((any::<bool>(), any::<bool>()), 0..12),
    )
        .prop_map(|(host, status, outcomes)| {
            let r = rule(RuleKind::Contains, "ok");
            let verdicts = if status == ConnectionStatus::ConnectionFailed {
                Vec::new()
            } else {
                outcomes
                    .into_iter()
                    .map(|(errored, passed)| {
                        if errored {
                            error_verdict(&r, "timeout")
                        } else {
                            evaluate(&r, &output(if passed { "ok" } else { "no" }))
                        }
                    })
                    .collect()
            };
            host_report(&host, status, None, verdicts)
        })
}

fn sum(reports: &[HostReport], f: impl Fn(&HostReport) -> u32) -> u32 {
    reports.iter().map(f).sum()
}

proptest! {
    #[test]
    fn numeric_kinds_without_digits_are_errors(
        stdout in "[a-zA-Z =:_-]{0,24}",
        expected in "[0-9]{1,5}",
        kind in prop_oneof![
            Just(RuleKind::NumericMax),
            Just(RuleKind::NumericMin),
            Just(RuleKind::NumericEquals),
        ],
    ) {
        let r = rule(kind.clone(), &expected);
        prop_assert_eq!(evaluate(&r, &output(&stdout)).status, VerdictStatus::Error);

        let swapped = rule(kind, &stdout);
        prop_assert_eq!(evaluate(&swapped, &output(&expected)).status, VerdictStatus::Error);
    }

    #[test]
    fn evaluation_is_deterministic(
        kind in arb_kind(),
        stdout in "[ -~\n]{0,64}",
        expected in "[ -~\n]{0,32}",
    ) {
        let r = rule(kind, &expected);
        let result = output(&stdout);
        prop_assert_eq!(evaluate(&r, &result), evaluate(&r, &result));
    }

    #[test]
    fn not_contains_is_the_complement_of_contains(
        stdout in "[a-c ]{0,16}",
        expected in "[a-c]{0,3}",
    ) {
        let present = evaluate(&rule(RuleKind::Contains, &expected), &output(&stdout)).status;
        let absent = evaluate(&rule(RuleKind::NotContains, &expected), &output(&stdout)).status;
        prop_assert_ne!(present, absent);
    }

    #[test]
    fn summary_equals_sum_over_hosts(
        reports in prop::collection::vec(arb_host_report(), 0..10),
        keep in prop::collection::vec(any::<bool>(), 10),
        seed in any::<u64>(),
    ) {
        let mut selected: Vec<HostReport> = reports
            .into_iter()
            .zip(keep)
            .filter_map(|(r, k)| k.then_some(r))
            .collect();
        let rotate_by = if selected.is_empty() { 0 } else { (seed as usize) % selected.len() };
        selected.rotate_left(rotate_by);
        if seed % 2 == 0 {
            selected.reverse();
        }

        let summary = RunSummary::from_reports(&selected);
        prop_assert_eq!(summary.hosts_total as usize, selected.len());
        prop_assert_eq!(summary.checks_passed, sum(&selected, |r| r.pass_count));
        prop_assert_eq!(summary.checks_failed, sum(&selected, |r| r.fail_count));
        prop_assert_eq!(summary.checks_errored, sum(&selected, |r| r.error_count));
        prop_assert_eq!(
            summary.checks_total,
            sum(&selected, |r| r.verdicts.len() as u32)
        );
        prop_assert_eq!(
            summary.hosts_completed + summary.hosts_connection_failed + summary.hosts_unexpected_error,
            summary.hosts_total
        );
    }
}
