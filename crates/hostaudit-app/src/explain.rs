//! The `explain` use case: look up rule kind documentation.

use anyhow::{Context, bail, ensure};
use hostaudit_domain::evaluate;
use hostaudit_domain::model::CommandResult;
use hostaudit_types::VerdictStatus;
use hostaudit_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the rule kind.
    Found(Explanation),
    /// Unknown rule kind; includes the available ones.
    NotFound {
        kind: String,
        available: &'static [&'static str],
    },
}

/// Look up an explanation for a rule kind (the `type:` value of a rule).
pub fn run_explain(kind: &str) -> ExplainOutput {
    match explain::lookup_explanation(kind) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            kind: kind.to_string(),
            available: explain::all_rule_kinds(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Expected value\n");
    out.push_str("--------------\n");
    out.push_str(exp.expected_format);
    out.push_str("\n\n");
    out.push_str("Example\n");
    out.push_str("-------\n\n");
    out.push_str("```yaml\n");
    out.push_str(exp.examples.rule);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str(&format!("Passing output: {}\n", exp.examples.passing));
    out.push_str(&format!("Failing output: {}\n", exp.examples.failing));

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(kind: &str, available: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule type: {kind}\n\n"));
    out.push_str("Available rule types:\n");
    for k in available {
        out.push_str(&format!("  - {k}\n"));
    }
    out.push_str("\nRules with an unknown type are evaluated as `contains`.\n");

    out
}

/// Parse an explanation's example rule and evaluate its sample outputs against it.
///
/// Fails unless the passing output yields PASS and the failing output does not.
pub fn verify_example(exp: &Explanation) -> anyhow::Result<()> {
    let rules = hostaudit_settings::parse_rules_yaml(&format!("rules:\n{}\n", exp.examples.rule))
        .context("parse example rule")?;
    let [rule] = rules.as_slice() else {
        bail!("example defines {} rules, expected one", rules.len());
    };

    let passing = evaluate(rule, &CommandResult::new(exp.examples.passing, "", Some(0)));
    ensure!(
        passing.status == VerdictStatus::Pass,
        "passing output evaluates to {}: {}",
        passing.status.as_str(),
        passing.actual_display
    );

    let failing = evaluate(rule, &CommandResult::new(exp.examples.failing, "", Some(0)));
    ensure!(
        failing.status != VerdictStatus::Pass,
        "failing output evaluates to PASS: {}",
        failing.actual_display
    );

    Ok(())
}
