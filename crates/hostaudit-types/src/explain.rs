//! Explain registry for rule kinds.
//!
//! Maps each `type:` value accepted in rule files to a human-readable description of its
//! comparison semantics and an example rule.

use crate::ids;

/// Explanation entry for a rule kind.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the comparison.
    pub title: &'static str,
    /// How the command output is compared against `expect`.
    pub description: &'static str,
    /// Format of the `expect` operand.
    pub expected_format: &'static str,
    /// Example rule and outputs.
    pub examples: ExamplePair,
}

/// A rule together with outputs that pass and fail it.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// YAML rule snippet.
    pub rule: &'static str,
    /// Command output that yields PASS.
    pub passing: &'static str,
    /// Command output that yields FAIL or ERROR.
    pub failing: &'static str,
}

/// Look up an explanation by rule kind name.
///
/// Returns `None` if the kind is not recognized.
pub fn lookup_explanation(kind: &str) -> Option<Explanation> {
    match kind {
        ids::KIND_TEXT => Some(explain_text()),
        ids::KIND_CONTAINS => Some(explain_contains()),
        ids::KIND_NOT_CONTAINS => Some(explain_not_contains()),
        ids::KIND_CONTAINS_MULTIPLE => Some(explain_contains_multiple()),
        ids::KIND_FILE_CONTAINS_LINES => Some(explain_file_contains_lines()),
        ids::KIND_NUMERIC_MAX => Some(explain_numeric(
            "Numeric Maximum",
            "\
Extracts the first run of decimal digits from the command output and from `expect`
and passes when the output number is less than or equal to the expected one.

If either side contains no digits the verdict is ERROR, not FAIL.",
            ExamplePair {
                rule: r#"- id: "5.2.7"
  name: "SSH MaxAuthTries is 4 or less"
  type: numeric_max
  check:
    command: "sshd -T | grep -i maxauthtries"
    expect: "4""#,
                passing: "maxauthtries 3",
                failing: "maxauthtries 6",
            },
        )),
        ids::KIND_NUMERIC_MIN => Some(explain_numeric(
            "Numeric Minimum",
            "\
Extracts the first run of decimal digits from the command output and from `expect`
and passes when the output number is greater than or equal to the expected one.

If either side contains no digits the verdict is ERROR, not FAIL.",
            ExamplePair {
                rule: r#"- id: "5.4.1"
  name: "Minimum password length is 14"
  type: numeric_min
  check:
    command: "grep ^minlen /etc/security/pwquality.conf"
    expect: "14""#,
                passing: "minlen = 14",
                failing: "minlen = 8",
            },
        )),
        ids::KIND_NUMERIC_EQUALS => Some(explain_numeric(
            "Numeric Equality",
            "\
Extracts the first run of decimal digits from the command output and from `expect`
and passes when both numbers are equal.

If either side contains no digits the verdict is ERROR, not FAIL.",
            ExamplePair {
                rule: r#"- id: "3.3.1"
  name: "Source routed packets are not accepted"
  type: numeric_equals
  check:
    command: "sysctl -n net.ipv4.conf.all.accept_source_route"
    expect: "0""#,
                passing: "0",
                failing: "1",
            },
        )),
        ids::KIND_LIST_VERSIONS => Some(explain_list_versions()),
        _ => None,
    }
}

/// List all rule kinds that have explanations.
pub fn all_rule_kinds() -> &'static [&'static str] {
    &[
        ids::KIND_TEXT,
        ids::KIND_CONTAINS,
        ids::KIND_NOT_CONTAINS,
        ids::KIND_CONTAINS_MULTIPLE,
        ids::KIND_FILE_CONTAINS_LINES,
        ids::KIND_NUMERIC_MAX,
        ids::KIND_NUMERIC_MIN,
        ids::KIND_NUMERIC_EQUALS,
        ids::KIND_LIST_VERSIONS,
    ]
}

fn explain_text() -> Explanation {
    Explanation {
        title: "Exact Text Match",
        description: "\
Passes when the command output, trimmed of surrounding whitespace, is exactly equal
to `expect`, also trimmed. This is the default when a rule omits `type`.",
        expected_format: "Plain string.",
        examples: ExamplePair {
            rule: r#"- id: "1.1.1"
  name: "cramfs module is disabled"
  type: text
  check:
    command: "modprobe -n -v cramfs"
    expect: "install /bin/true""#,
            passing: "install /bin/true",
            failing: "insmod /lib/modules/cramfs.ko",
        },
    }
}

fn explain_contains() -> Explanation {
    Explanation {
        title: "Substring Present",
        description: "\
Passes when `expect` appears anywhere in the command output.

Rules with an unrecognized `type` are evaluated with this comparison as well.",
        expected_format: "Plain string.",
        examples: ExamplePair {
            rule: r#"- id: "4.1.1"
  name: "auditd is enabled"
  type: contains
  check:
    command: "systemctl is-enabled auditd"
    expect: "enabled""#,
            passing: "enabled",
            failing: "disabled",
        },
    }
}

fn explain_not_contains() -> Explanation {
    Explanation {
        title: "Substring Absent",
        description: "Passes when `expect` does not appear anywhere in the command output.",
        expected_format: "Plain string.",
        examples: ExamplePair {
            rule: r#"- id: "5.2.8"
  name: "SSH root login is disabled"
  type: not_contains
  check:
    command: "sshd -T | grep -i permitrootlogin"
    expect: "yes""#,
            passing: "permitrootlogin no",
            failing: "permitrootlogin yes",
        },
    }
}

fn explain_contains_multiple() -> Explanation {
    Explanation {
        title: "All Tokens Present",
        description: "\
Splits `expect` on whitespace and passes when every resulting token appears in the
command output. Tokens are matched as substrings, independently of each other.",
        expected_format: "Whitespace-separated tokens.",
        examples: ExamplePair {
            rule: r#"- id: "1.4.1"
  name: "Bootloader config permissions"
  type: contains_multiple
  check:
    command: "stat -c '%a %U %G' /boot/grub/grub.cfg"
    expect: "400 root root""#,
            passing: "400 root root",
            failing: "644 admin admin",
        },
    }
}

fn explain_file_contains_lines() -> Explanation {
    Explanation {
        title: "All Lines Present",
        description: "\
Splits `expect` into lines, ignores blank ones, and passes when every remaining line
(trimmed) appears in the command output. On failure the report lists the missing lines.",
        expected_format: "Multi-line string (YAML block scalar).",
        examples: ExamplePair {
            rule: r#"- id: "4.1.3"
  name: "Audit rules for time changes"
  type: file_contains_lines
  check:
    command: "cat /etc/audit/rules.d/time.rules"
    expect: |
      -a always,exit -F arch=b64 -S adjtimex -k time-change
      -w /etc/localtime -p wa -k time-change"#,
            passing: "-a always,exit -F arch=b64 -S adjtimex -k time-change\n-w /etc/localtime -p wa -k time-change",
            failing: "-w /etc/localtime -p wa -k time-change",
        },
    }
}

fn explain_numeric(
    title: &'static str,
    description: &'static str,
    examples: ExamplePair,
) -> Explanation {
    Explanation {
        title,
        description,
        expected_format: "Any string containing a decimal number; the first number is used.",
        examples,
    }
}

fn explain_list_versions() -> Explanation {
    Explanation {
        title: "Supported Version Lines",
        description: "\
Checks an installed version against a list of supported release lines, each with its
own minimum minor version.

- Output containing `NOT_INSTALLED` fails immediately.
- The first `major.minor` pair in the output is the installed version; none is an ERROR.
- `expect` lists `major.minor` floors. When a major appears more than once the smallest
  minor is used.
- A major that is not listed fails as unsupported; otherwise the minor must be at least
  the floor for that major.",
        expected_format: "Comma-separated `major.minor` list, e.g. `9.6, 12.1`.",
        examples: ExamplePair {
            rule: r#"- id: "pg.1"
  name: "PostgreSQL is on a supported release"
  type: list_versions
  check:
    command: "psql --version 2>/dev/null | awk '{print $3}' || echo NOT_INSTALLED"
    expect: "9.6, 12.1""#,
            passing: "12.4",
            failing: "9.2",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_kind_has_an_explanation() {
        for kind in all_rule_kinds() {
            let exp = lookup_explanation(kind).expect("explanation");
            assert!(!exp.title.is_empty());
            assert!(!exp.description.is_empty());
            assert!(!exp.expected_format.is_empty());
            assert!(exp.examples.rule.contains(kind), "example for {kind}");
        }
    }

    #[test]
    fn unknown_kind_has_no_explanation() {
        assert!(lookup_explanation("regex").is_none());
    }
}
