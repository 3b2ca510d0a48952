//! Fuzz target for rule evaluation.
//!
//! Goal: every comparison returns a verdict for arbitrary output and `expect` text, and
//! evaluation is deterministic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use hostaudit_domain::evaluate;
use hostaudit_domain::model::{CommandResult, RuleDefinition};
use hostaudit_types::{RuleKind, explain};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct EvaluateInput {
    /// Index into the known kinds; out of range selects an unknown kind.
    kind: u8,
    expected: String,
    stdout: String,
    stderr: String,
}

fuzz_target!(|input: EvaluateInput| {
    if input.expected.len() > 4096 || input.stdout.len() > 16384 {
        return;
    }

    let kind = explain::all_rule_kinds()
        .get(usize::from(input.kind))
        .map(|name| RuleKind::parse(name))
        .unwrap_or_else(|| RuleKind::Other("fuzz".to_string()));

    let rule = RuleDefinition {
        id: "fuzz.1".to_string(),
        name: "fuzz".to_string(),
        kind,
        command: "true".to_string(),
        expected: input.expected,
    };
    let result = CommandResult::new(&input.stdout, &input.stderr, Some(0));

    let first = evaluate(&rule, &result);
    let second = evaluate(&rule, &result);
    assert_eq!(first, second);
});
