use crate::model::{CommandResult, RuleDefinition};
use hostaudit_types::RuleKind;

pub fn rule(kind: RuleKind, expected: &str) -> RuleDefinition {
    RuleDefinition {
        id: format!("test.{}", kind.as_str()),
        name: format!("{} rule", kind.as_str()),
        kind,
        command: "true".to_string(),
        expected: expected.to_string(),
    }
}

pub fn output(stdout: &str) -> CommandResult {
    CommandResult::new(stdout, "", Some(0))
}
