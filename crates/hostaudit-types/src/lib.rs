//! Stable DTOs and IDs used across the hostaudit workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted audit report
//! - stable rule kind names
//! - explain registry for comparison kinds

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    AuditData, AuditReport, AuditReportV1, CheckVerdict, ConnectionStatus, HostReport,
    ReportEnvelope, RuleKind, RunSummary, SCHEMA_REPORT_V1, ToolMeta, VerdictStatus,
};
