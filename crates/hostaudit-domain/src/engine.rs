use crate::comparisons::{self, Comparison};
use crate::model::{CommandResult, RuleDefinition};
use hostaudit_types::{CheckVerdict, RuleKind, VerdictStatus};

/// Evaluate one rule against the output of its command.
///
/// Pure and deterministic: the same inputs always produce the same verdict.
pub fn evaluate(rule: &RuleDefinition, result: &CommandResult) -> CheckVerdict {
    let stdout = result.stdout.as_str();
    let expected = rule.expected.as_str();

    let Comparison { status, display } = match &rule.kind {
        RuleKind::Text => comparisons::text_equals(stdout, expected),
        RuleKind::Contains => comparisons::contains(stdout, expected),
        RuleKind::NotContains => comparisons::not_contains(stdout, expected),
        RuleKind::ContainsMultiple => comparisons::contains_all_tokens(stdout, expected),
        RuleKind::FileContainsLines => comparisons::contains_all_lines(stdout, expected),
        RuleKind::NumericMax => comparisons::numeric(stdout, expected, comparisons::NumericOp::Max),
        RuleKind::NumericMin => comparisons::numeric(stdout, expected, comparisons::NumericOp::Min),
        RuleKind::NumericEquals => {
            comparisons::numeric(stdout, expected, comparisons::NumericOp::Equals)
        }
        RuleKind::ListVersions => comparisons::list_versions(stdout, expected),
        // Legacy rule files: anything unrecognized is a substring check.
        RuleKind::Other(_) => comparisons::contains(stdout, expected),
    };

    CheckVerdict {
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        kind: rule.kind.clone(),
        status,
        expected: rule.expected.clone(),
        actual_raw: result.stdout.clone(),
        actual_display: display,
        session_error: (!result.stderr.is_empty()).then(|| result.stderr.clone()),
    }
}

/// Verdict for a rule that could not be evaluated (templating or transport failure).
pub fn error_verdict(rule: &RuleDefinition, message: &str) -> CheckVerdict {
    CheckVerdict {
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        kind: rule.kind.clone(),
        status: VerdictStatus::Error,
        expected: rule.expected.clone(),
        actual_raw: String::new(),
        actual_display: format!("Error: {message}"),
        session_error: Some(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{output, rule};

    #[test]
    fn unknown_kind_falls_back_to_substring_containment() {
        let r = rule(RuleKind::Other("regex".to_string()), "enabled");
        assert_eq!(
            evaluate(&r, &output("service enabled")).status,
            VerdictStatus::Pass
        );
        assert_eq!(
            evaluate(&r, &output("service disabled")).status,
            VerdictStatus::Fail
        );
        assert_eq!(
            evaluate(&r, &output("enabl")).status,
            VerdictStatus::Fail
        );
    }

    #[test]
    fn verdict_carries_rule_identity_and_stderr() {
        let r = rule(RuleKind::Contains, "yes");
        let result = CommandResult::new("  yes \n", " permission denied\n", Some(1));
        let verdict = evaluate(&r, &result);

        assert_eq!(verdict.rule_id, r.id);
        assert_eq!(verdict.rule_name, r.name);
        assert_eq!(verdict.kind, RuleKind::Contains);
        assert_eq!(verdict.actual_raw, "yes");
        assert_eq!(verdict.session_error.as_deref(), Some("permission denied"));
        assert_eq!(verdict.status, VerdictStatus::Pass);
    }

    #[test]
    fn empty_stderr_is_not_reported() {
        let r = rule(RuleKind::Text, "ok");
        let verdict = evaluate(&r, &output("ok"));
        assert!(verdict.session_error.is_none());
    }

    #[test]
    fn error_verdict_keeps_expected_and_message() {
        let r = rule(RuleKind::NumericMax, "5");
        let verdict = error_verdict(&r, "channel closed");
        assert_eq!(verdict.status, VerdictStatus::Error);
        assert_eq!(verdict.expected, "5");
        assert_eq!(verdict.actual_display, "Error: channel closed");
        assert_eq!(verdict.session_error.as_deref(), Some("channel closed"));
    }
}
