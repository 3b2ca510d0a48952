#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableCheckStatus {
    Pass,
    Fail,
    Error,
}

impl RenderableCheckStatus {
    pub fn label(self) -> &'static str {
        match self {
            RenderableCheckStatus::Pass => "PASS",
            RenderableCheckStatus::Fail => "FAIL",
            RenderableCheckStatus::Error => "ERROR",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableHostStatus {
    Completed,
    ConnectionFailed,
    UnexpectedError,
}

impl RenderableHostStatus {
    pub fn label(self) -> &'static str {
        match self {
            RenderableHostStatus::Completed => "completed",
            RenderableHostStatus::ConnectionFailed => "connection failed",
            RenderableHostStatus::UnexpectedError => "unexpected error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableCheck {
    pub rule_id: String,
    pub rule_name: String,
    pub status: RenderableCheckStatus,
    pub expected: String,
    pub actual: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableHost {
    pub host: String,
    pub status: RenderableHostStatus,
    pub error: Option<String>,
    pub checks: Vec<RenderableCheck>,
    pub passed: u32,
    pub failed: u32,
    pub errored: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderableSummary {
    pub hosts_total: u32,
    pub hosts_completed: u32,
    pub hosts_connection_failed: u32,
    pub hosts_unexpected_error: u32,
    pub checks_total: u32,
    pub checks_passed: u32,
    pub checks_failed: u32,
    pub checks_errored: u32,
    /// Percent of passed checks.
    pub pass_rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableReport {
    pub hosts: Vec<RenderableHost>,
    pub summary: RenderableSummary,
}
