//! Stable identifiers for rule kinds and report vocabulary.
//!
//! Rule kinds are the `type:` values accepted in rule files. They are snake_case and never renamed.

// Rule kinds
pub const KIND_TEXT: &str = "text";
pub const KIND_CONTAINS: &str = "contains";
pub const KIND_NOT_CONTAINS: &str = "not_contains";
pub const KIND_CONTAINS_MULTIPLE: &str = "contains_multiple";
pub const KIND_FILE_CONTAINS_LINES: &str = "file_contains_lines";
pub const KIND_NUMERIC_MAX: &str = "numeric_max";
pub const KIND_NUMERIC_MIN: &str = "numeric_min";
pub const KIND_NUMERIC_EQUALS: &str = "numeric_equals";
pub const KIND_LIST_VERSIONS: &str = "list_versions";

// Tool-level
pub const TOOL_NAME: &str = "hostaudit";
