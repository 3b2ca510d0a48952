use hostaudit_types::VerdictStatus;

pub(crate) mod numeric;
mod text;
mod versions;

#[cfg(test)]
mod tests;

pub use numeric::{NumericOp, numeric};
pub use text::{contains, contains_all_lines, contains_all_tokens, not_contains, text_equals};
pub use versions::list_versions;

/// Result of one comparison: the status plus the human-readable rendering of the actual value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub status: VerdictStatus,
    pub display: String,
}

impl Comparison {
    pub fn new(status: VerdictStatus, display: impl Into<String>) -> Self {
        Self {
            status,
            display: display.into(),
        }
    }

    pub fn pass_if(passed: bool, display: impl Into<String>) -> Self {
        let status = if passed {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        };
        Self::new(status, display)
    }
}
