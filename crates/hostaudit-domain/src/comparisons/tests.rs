use super::*;
use hostaudit_types::VerdictStatus;

#[test]
fn text_compares_trimmed_values() {
    assert_eq!(text_equals("install /bin/true", " install /bin/true\n").status, VerdictStatus::Pass);
    assert_eq!(text_equals("install /bin/false", "install /bin/true").status, VerdictStatus::Fail);
    assert_eq!(text_equals("", "").status, VerdictStatus::Pass);
}

#[test]
fn contains_and_not_contains_are_complements() {
    for (stdout, expected) in [("permitrootlogin yes", "yes"), ("permitrootlogin no", "yes")] {
        let present = contains(stdout, expected).status;
        let absent = not_contains(stdout, expected).status;
        assert_ne!(present, absent, "{stdout:?} / {expected:?}");
    }
}

#[test]
fn contains_multiple_requires_every_token() {
    assert_eq!(contains_all_tokens("xA y", "A B").status, VerdictStatus::Fail);
    assert_eq!(contains_all_tokens("A B C", "A B").status, VerdictStatus::Pass);
    // Tokens match as substrings, independently of order.
    assert_eq!(contains_all_tokens("root 400 root", "400 root root").status, VerdictStatus::Pass);
}

#[test]
fn file_contains_lines_reports_missing_lines() {
    let expected = "-w /etc/localtime -p wa\n\n   -a always,exit -S adjtimex  \n";

    let all = contains_all_lines("-a always,exit -S adjtimex\n-w /etc/localtime -p wa", expected);
    assert_eq!(all.status, VerdictStatus::Pass);
    assert_eq!(all.display, "All lines found");

    let partial = contains_all_lines("-w /etc/localtime -p wa", expected);
    assert_eq!(partial.status, VerdictStatus::Fail);
    assert_eq!(partial.display, r#"Missing lines: ["-a always,exit -S adjtimex"]"#);
}

#[test]
fn file_contains_lines_is_idempotent() {
    let first = contains_all_lines("a\nb", "a\nc");
    let second = contains_all_lines("a\nb", "a\nc");
    assert_eq!(first, second);
}

#[test]
fn numeric_uses_first_number_on_each_side() {
    let max = numeric("maxauthtries 3", "4", NumericOp::Max);
    assert_eq!(max.status, VerdictStatus::Pass);
    assert_eq!(max.display, "3 (<= 4)");

    assert_eq!(numeric("maxauthtries 6", "4", NumericOp::Max).status, VerdictStatus::Fail);
    assert_eq!(numeric("minlen = 14", "at least 14", NumericOp::Min).status, VerdictStatus::Pass);
    assert_eq!(numeric("minlen = 8", "14", NumericOp::Min).status, VerdictStatus::Fail);
    assert_eq!(numeric("value 0 of 7", "0", NumericOp::Equals).status, VerdictStatus::Pass);
    assert_eq!(numeric("= 1", "0", NumericOp::Equals).display, "1 (== 0)");
}

#[test]
fn numeric_without_digits_is_an_error() {
    for (stdout, expected) in [("none", "5"), ("5", "n/a"), ("", "")] {
        for op in [NumericOp::Max, NumericOp::Min, NumericOp::Equals] {
            let cmp = numeric(stdout, expected, op);
            assert_eq!(cmp.status, VerdictStatus::Error, "{stdout:?} {expected:?} {op:?}");
            assert_eq!(cmp.display, format!("Failed to extract numbers: {stdout}"));
        }
    }
}

#[test]
fn numeric_out_of_range_is_an_error() {
    let huge = "9".repeat(60);
    assert_eq!(numeric(&huge, "1", NumericOp::Max).status, VerdictStatus::Error);
}

#[test]
fn extract_number_finds_leading_digit_run() {
    assert_eq!(numeric::extract_number("abc 042 def 7"), Some(42));
    assert_eq!(numeric::extract_number("-"), None);
}

#[test]
fn numeric_skips_non_ascii_digits() {
    // U+0663 ARABIC-INDIC DIGIT THREE
    let cmp = numeric("value \u{0663} limit 3", "4", NumericOp::Max);
    assert_eq!(cmp.status, VerdictStatus::Pass);
    assert_eq!(cmp.display, "3 (<= 4)");

    let only_foreign = numeric("\u{0665}", "4", NumericOp::Max);
    assert_eq!(only_foreign.status, VerdictStatus::Error);
}

#[test]
fn list_versions_accepts_supported_line_at_or_above_floor() {
    let cmp = list_versions("9.6.3", "9.6, 12.1");
    assert_eq!(cmp.status, VerdictStatus::Pass);
    assert_eq!(cmp.display, "9.6.3 | Version 9.6 >= required 9.6");

    let newer = list_versions("12.4", "9.6, 12.1");
    assert_eq!(newer.status, VerdictStatus::Pass);
}

#[test]
fn list_versions_rejects_minor_below_floor() {
    let cmp = list_versions("9.2", "9.6, 12.1");
    assert_eq!(cmp.status, VerdictStatus::Fail);
    assert_eq!(cmp.display, "9.2 | Version 9.2 < required 9.6");
}

#[test]
fn list_versions_rejects_unlisted_major() {
    let cmp = list_versions("15.0", "12.1, 9.6");
    assert_eq!(cmp.status, VerdictStatus::Fail);
    assert_eq!(
        cmp.display,
        "15.0 | Version 15.0 not supported. Supported: 9.6, 12.1"
    );
}

#[test]
fn list_versions_not_installed_fails_regardless_of_expected() {
    for expected in ["9.6, 12.1", "", "garbage"] {
        let cmp = list_versions("NOT_INSTALLED", expected);
        assert_eq!(cmp.status, VerdictStatus::Fail);
        assert_eq!(cmp.display, "NOT_INSTALLED | Service is not installed");
    }
}

#[test]
fn list_versions_without_version_is_an_error() {
    let cmp = list_versions("psql: command failed", "9.6");
    assert_eq!(cmp.status, VerdictStatus::Error);
    assert_eq!(
        cmp.display,
        "psql: command failed | Cannot parse version: psql: command failed"
    );
}

#[test]
fn list_versions_skips_non_ascii_version_digits() {
    let cmp = list_versions("\u{0661}.\u{0662} server 9.6.1", "9.6");
    assert_eq!(cmp.status, VerdictStatus::Pass);
    assert!(cmp.display.ends_with("Version 9.6 >= required 9.6"), "{}", cmp.display);
}

#[test]
fn list_versions_keeps_smallest_minor_per_major() {
    assert_eq!(list_versions("12.2", "12.5, 12.1").status, VerdictStatus::Pass);
}

#[test]
fn list_versions_ignores_malformed_tokens() {
    // "12" and "13.1.2" and "x.1" are not two-part numeric tokens.
    let cmp = list_versions("13.1", "12, 13.1.2, x.1, 9.6");
    assert_eq!(cmp.status, VerdictStatus::Fail);
    assert!(cmp.display.ends_with("Supported: 9.6"), "{}", cmp.display);
}
