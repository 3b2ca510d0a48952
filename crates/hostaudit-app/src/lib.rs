//! Use case orchestration for hostaudit.
//!
//! This crate provides the application layer: the multi-host audit orchestrator and the use
//! cases that coordinate settings, sessions, the rule engine, and renderers. The CLI crate
//! depends on this; it only handles argument parsing, I/O, and exit codes.

#![forbid(unsafe_code)]

mod audit;
mod explain;
mod orchestrator;
mod render;
mod report;

pub use audit::{
    AuditInput, AuditOutput, AuditPlan, audit_exit_code, execute_plan, prepare_audit, run_audit,
};
pub use explain::{
    ExplainOutput, format_explanation, format_not_found, run_explain, verify_example,
};
pub use orchestrator::{AuditError, CancelFlag, Orchestrator};
pub use render::{render_console, render_html, render_markdown};
pub use report::{parse_report_json, serialize_report, to_renderable};

#[cfg(test)]
mod test_support;
