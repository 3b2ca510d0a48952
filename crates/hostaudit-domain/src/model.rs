use hostaudit_types::RuleKind;

/// One declarative check, loaded once per run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDefinition {
    pub id: String,
    pub name: String,
    pub kind: RuleKind,
    /// Command template; may contain the `{password}` placeholder.
    pub command: String,
    pub expected: String,
}

/// Captured output of one remote command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: Option<i32>,
}

impl CommandResult {
    /// Build a result from raw channel output. Both streams are trimmed.
    pub fn new(stdout: &str, stderr: &str, exit_status: Option<i32>) -> Self {
        Self {
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
            exit_status,
        }
    }
}
