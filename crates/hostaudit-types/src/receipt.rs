use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for hostaudit reports.
pub const SCHEMA_REPORT_V1: &str = "hostaudit.report.v1";

/// Comparison strategy of a rule.
///
/// Unknown names are preserved in `Other` so reports echo exactly what the rule file declared;
/// the engine evaluates them with the substring-containment default.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RuleKind {
    #[default]
    Text,
    Contains,
    NotContains,
    ContainsMultiple,
    FileContainsLines,
    NumericMax,
    NumericMin,
    NumericEquals,
    ListVersions,
    Other(String),
}

impl RuleKind {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            ids::KIND_TEXT => RuleKind::Text,
            ids::KIND_CONTAINS => RuleKind::Contains,
            ids::KIND_NOT_CONTAINS => RuleKind::NotContains,
            ids::KIND_CONTAINS_MULTIPLE => RuleKind::ContainsMultiple,
            ids::KIND_FILE_CONTAINS_LINES => RuleKind::FileContainsLines,
            ids::KIND_NUMERIC_MAX => RuleKind::NumericMax,
            ids::KIND_NUMERIC_MIN => RuleKind::NumericMin,
            ids::KIND_NUMERIC_EQUALS => RuleKind::NumericEquals,
            ids::KIND_LIST_VERSIONS => RuleKind::ListVersions,
            other => RuleKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuleKind::Text => ids::KIND_TEXT,
            RuleKind::Contains => ids::KIND_CONTAINS,
            RuleKind::NotContains => ids::KIND_NOT_CONTAINS,
            RuleKind::ContainsMultiple => ids::KIND_CONTAINS_MULTIPLE,
            RuleKind::FileContainsLines => ids::KIND_FILE_CONTAINS_LINES,
            RuleKind::NumericMax => ids::KIND_NUMERIC_MAX,
            RuleKind::NumericMin => ids::KIND_NUMERIC_MIN,
            RuleKind::NumericEquals => ids::KIND_NUMERIC_EQUALS,
            RuleKind::ListVersions => ids::KIND_LIST_VERSIONS,
            RuleKind::Other(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, RuleKind::Other(_))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(RuleKind::parse(&name))
    }
}

/// Outcome of one rule against one host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Pass,
    Fail,
    Error,
}

impl VerdictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictStatus::Pass => "PASS",
            VerdictStatus::Fail => "FAIL",
            VerdictStatus::Error => "ERROR",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckVerdict {
    pub rule_id: String,
    pub rule_name: String,
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub kind: RuleKind,
    pub status: VerdictStatus,
    pub expected: String,
    /// Trimmed stdout exactly as captured.
    pub actual_raw: String,
    /// Human-oriented rendering (may annotate the bound compared against).
    pub actual_display: String,
    /// Remote stderr, or the transport/evaluation failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Completed,
    ConnectionFailed,
    UnexpectedError,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Completed => "completed",
            ConnectionStatus::ConnectionFailed => "connection_failed",
            ConnectionStatus::UnexpectedError => "unexpected_error",
        }
    }
}

/// Ordered verdicts and connection outcome for one audited host.
///
/// Counts are derived from `verdicts` when the report is built and never updated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HostReport {
    pub host: String,
    pub connection_status: ConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub verdicts: Vec<CheckVerdict>,
    pub pass_count: u32,
    pub fail_count: u32,
    pub error_count: u32,
}

/// Run-level aggregate, folded from the host reports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunSummary {
    pub hosts_total: u32,
    pub hosts_completed: u32,
    pub hosts_connection_failed: u32,
    pub hosts_unexpected_error: u32,
    pub checks_total: u32,
    pub checks_passed: u32,
    pub checks_failed: u32,
    pub checks_errored: u32,
}

impl RunSummary {
    /// Fold the host reports of one run into its summary.
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a HostReport>,
    {
        reports
            .into_iter()
            .fold(RunSummary::default(), |mut acc, report| {
                acc.hosts_total += 1;
                match report.connection_status {
                    ConnectionStatus::Completed => acc.hosts_completed += 1,
                    ConnectionStatus::ConnectionFailed => acc.hosts_connection_failed += 1,
                    ConnectionStatus::UnexpectedError => acc.hosts_unexpected_error += 1,
                }
                acc.checks_passed += report.pass_count;
                acc.checks_failed += report.fail_count;
                acc.checks_errored += report.error_count;
                acc.checks_total += report.pass_count + report.fail_count + report.error_count;
                acc
            })
    }

    /// True when every host completed and every check passed.
    pub fn all_passed(&self) -> bool {
        self.hosts_completed == self.hosts_total
            && self.checks_failed == 0
            && self.checks_errored == 0
    }

    /// Share of passed checks, in percent. Zero when nothing ran.
    pub fn pass_rate(&self) -> f64 {
        if self.checks_total == 0 {
            return 0.0;
        }
        f64::from(self.checks_passed) / f64::from(self.checks_total) * 100.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Hostaudit-specific run metadata embedded in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct AuditData {
    pub profile: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_set: Option<String>,
    pub rules_loaded: u32,

    pub host_key_policy: String,
    pub credential_injection: String,
    pub concurrency: u32,
}

/// A generic report envelope.
///
/// Keeping this generic allows tool-specific data while still enforcing a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = AuditData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub hosts: Vec<HostReport>,
    pub summary: RunSummary,
    pub data: TData,
}

pub type AuditReportV1 = ReportEnvelope<AuditData>;

pub type AuditReport = AuditReportV1;
