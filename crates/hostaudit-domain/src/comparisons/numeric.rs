use super::Comparison;
use hostaudit_types::VerdictStatus;
use regex::Regex;
use std::sync::LazyLock;

/// ASCII digits only; Unicode `\d` also matches digits `u128` cannot parse.
static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static regex compiles"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericOp {
    Max,
    Min,
    Equals,
}

impl NumericOp {
    fn symbol(self) -> &'static str {
        match self {
            NumericOp::Max => "<=",
            NumericOp::Min => ">=",
            NumericOp::Equals => "==",
        }
    }

    fn holds(self, actual: u128, expected: u128) -> bool {
        match self {
            NumericOp::Max => actual <= expected,
            NumericOp::Min => actual >= expected,
            NumericOp::Equals => actual == expected,
        }
    }
}

/// First run of ASCII decimal digits in `text`, if it fits in a `u128`.
pub(crate) fn extract_number(text: &str) -> Option<u128> {
    FIRST_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<u128>().ok())
}

/// Compare the first number of `stdout` against the first number of `expected`.
///
/// A side without a usable number is an ERROR, never a FAIL.
pub fn numeric(stdout: &str, expected: &str, op: NumericOp) -> Comparison {
    match (extract_number(stdout), extract_number(expected)) {
        (Some(actual), Some(bound)) => Comparison::pass_if(
            op.holds(actual, bound),
            format!("{actual} ({} {bound})", op.symbol()),
        ),
        _ => Comparison::new(
            VerdictStatus::Error,
            format!("Failed to extract numbers: {stdout}"),
        ),
    }
}
