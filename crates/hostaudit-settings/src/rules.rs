//! YAML rule-set loading.

use anyhow::Context;
use hostaudit_domain::model::RuleDefinition;
use hostaudit_types::RuleKind;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    id: Value,
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    check: CheckEntry,
}

#[derive(Debug, Deserialize)]
struct CheckEntry {
    command: String,
    #[serde(default)]
    expect: Value,
}

/// Parse a rule file into definitions, in file order.
///
/// Scalar `id` and `expect` values of any YAML type are taken in their text form, so
/// `expect: 4` and `expect: "4"` are the same rule. A missing `type` means `text`.
pub fn parse_rules_yaml(input: &str) -> anyhow::Result<Vec<RuleDefinition>> {
    let file: RuleFile = serde_yaml::from_str(input).context("parse rule file")?;

    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut rules = Vec::with_capacity(file.rules.len());

    for (index, entry) in file.rules.into_iter().enumerate() {
        let position = index + 1;
        let id = scalar_text(&entry.id)
            .with_context(|| format!("rule #{position}: `id` must be a scalar"))?;
        anyhow::ensure!(!id.trim().is_empty(), "rule #{position}: `id` is empty");

        if let Some(first) = seen.insert(id.clone(), position) {
            anyhow::bail!("duplicate rule id `{id}` (rules #{first} and #{position})");
        }

        let expected = scalar_text(&entry.check.expect)
            .with_context(|| format!("rule `{id}`: `check.expect` must be a scalar"))?;

        let kind = entry
            .kind
            .as_deref()
            .map(RuleKind::parse)
            .unwrap_or_default();
        if !kind.is_recognized() {
            warn!(
                rule = %id,
                kind = %kind,
                "unrecognized rule type; evaluating as substring containment"
            );
        }

        rules.push(RuleDefinition {
            id,
            name: entry.name,
            kind,
            command: entry.check.command,
            expected,
        });
    }

    Ok(rules)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_in_file_order() {
        let yaml = r#"
rules:
  - id: "5.2.8"
    name: "SSH root login is disabled"
    type: not_contains
    check:
      command: "sshd -T | grep -i permitrootlogin"
      expect: "yes"
  - id: 1.1
    name: "cramfs disabled"
    check:
      command: "modprobe -n -v cramfs"
      expect: install /bin/true
"#;
        let rules = parse_rules_yaml(yaml).expect("parse");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, "5.2.8");
        assert_eq!(rules[0].kind, RuleKind::NotContains);
        assert_eq!(rules[0].expected, "yes");
        assert_eq!(rules[1].id, "1.1");
        assert_eq!(rules[1].kind, RuleKind::Text);
        assert_eq!(rules[1].command, "modprobe -n -v cramfs");
    }

    #[test]
    fn scalar_expectations_become_text() {
        let yaml = r#"
rules:
  - { id: a, name: A, type: numeric_max, check: { command: "x", expect: 4 } }
  - { id: b, name: B, type: list_versions, check: { command: "x", expect: 9.6 } }
  - { id: c, name: C, check: { command: "x", expect: true } }
  - { id: d, name: D, check: { command: "x" } }
"#;
        let expected: Vec<String> = parse_rules_yaml(yaml)
            .expect("parse")
            .into_iter()
            .map(|r| r.expected)
            .collect();
        assert_eq!(expected, ["4", "9.6", "true", ""]);
    }

    #[test]
    fn block_scalars_keep_their_lines() {
        let yaml = "rules:\n  - id: x\n    name: X\n    type: file_contains_lines\n    check:\n      command: cat f\n      expect: |\n        line one\n        line two\n";
        let rules = parse_rules_yaml(yaml).expect("parse");
        assert_eq!(rules[0].expected, "line one\nline two\n");
    }

    #[test]
    fn unknown_type_is_kept_verbatim() {
        let yaml = "rules:\n  - { id: x, name: X, type: regex, check: { command: c, expect: e } }\n";
        let rules = parse_rules_yaml(yaml).expect("parse");
        assert_eq!(rules[0].kind, RuleKind::Other("regex".to_string()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = r#"
rules:
  - { id: "1.1", name: A, check: { command: a } }
  - { id: "1.2", name: B, check: { command: b } }
  - { id: "1.1", name: C, check: { command: c } }
"#;
        let err = parse_rules_yaml(yaml).expect_err("duplicate");
        assert_eq!(err.to_string(), "duplicate rule id `1.1` (rules #1 and #3)");
    }

    #[test]
    fn structured_expect_is_rejected() {
        let yaml = "rules:\n  - { id: x, name: X, check: { command: c, expect: [a, b] } }\n";
        let err = parse_rules_yaml(yaml).expect_err("list expect");
        assert!(err.to_string().contains("check.expect"), "{err}");
    }

    #[test]
    fn missing_command_is_a_parse_error() {
        let yaml = "rules:\n  - { id: x, name: X, check: { expect: e } }\n";
        assert!(parse_rules_yaml(yaml).is_err());
    }

    #[test]
    fn empty_file_has_no_rules() {
        assert!(parse_rules_yaml("rules: []").expect("parse").is_empty());
        assert!(parse_rules_yaml("{}").expect("parse").is_empty());
    }
}
