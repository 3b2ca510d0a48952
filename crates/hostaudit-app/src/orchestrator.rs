//! Multi-host audit orchestration.
//!
//! Per host: open a session, run every rule in order on it, close it, and fold the verdicts
//! into a [`HostReport`]. Hosts are independent and run on a bounded rayon pool.

use hostaudit_domain::model::RuleDefinition;
use hostaudit_domain::policy::CredentialInjection;
use hostaudit_domain::report::{connection_failed, host_report};
use hostaudit_domain::{error_verdict, evaluate};
use hostaudit_session::{
    CommandSession, Connector, HostTarget, Secret, TransportError, render_command,
};
use hostaudit_types::{CheckVerdict, ConnectionStatus, HostReport};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("audit cancelled")]
    Cancelled,

    #[error("cannot start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Cooperative cancellation, checked before each host and each rule.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs one rule set against many hosts.
pub struct Orchestrator<'a, C: Connector> {
    connector: &'a C,
    rules: &'a [RuleDefinition],
    password: Option<&'a Secret>,
    injection: CredentialInjection,
    host_timeout: Option<Duration>,
    concurrency: usize,
    cancel: CancelFlag,
}

/// How the rule loop of one host ended.
struct HostRun {
    verdicts: Vec<CheckVerdict>,
    aborted: Option<String>,
}

impl<'a, C: Connector> Orchestrator<'a, C> {
    pub fn new(connector: &'a C, rules: &'a [RuleDefinition]) -> Self {
        Self {
            connector,
            rules,
            password: None,
            injection: CredentialInjection::Stdin,
            host_timeout: None,
            concurrency: 1,
            cancel: CancelFlag::default(),
        }
    }

    pub fn with_password(mut self, password: Option<&'a Secret>) -> Self {
        self.password = password;
        self
    }

    pub fn with_injection(mut self, injection: CredentialInjection) -> Self {
        self.injection = injection;
        self
    }

    pub fn with_host_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.host_timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Audit every target. Reports come back in input order regardless of concurrency.
    pub fn audit_hosts(&self, targets: &[HostTarget]) -> Result<Vec<HostReport>, AuditError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .thread_name(|i| format!("hostaudit-worker-{i}"))
            .build()?;

        pool.install(|| {
            targets
                .par_iter()
                .map(|target| self.audit_host(target))
                .collect()
        })
    }

    /// Audit one host. Connection and transport failures end up in the report; only
    /// cancellation is an error.
    pub fn audit_host(&self, target: &HostTarget) -> Result<HostReport, AuditError> {
        let span = info_span!("host", host = %target);
        let _enter = span.enter();

        self.check_cancelled()?;
        let deadline = self.host_timeout.map(|t| Instant::now() + t);

        let mut session = match self.connector.open(target) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "connection failed");
                return Ok(connection_failed(&target.label, e.to_string()));
            }
        };
        info!("connected");

        let run = self.run_rules(&mut session, deadline);
        session.close();
        let run = run?;

        let report = match run.aborted {
            None => host_report(
                &target.label,
                ConnectionStatus::Completed,
                None,
                run.verdicts,
            ),
            Some(message) => host_report(
                &target.label,
                ConnectionStatus::UnexpectedError,
                Some(message),
                run.verdicts,
            ),
        };
        info!(
            status = report.connection_status.as_str(),
            pass = report.pass_count,
            fail = report.fail_count,
            error = report.error_count,
            "host audited"
        );
        Ok(report)
    }

    fn run_rules(
        &self,
        session: &mut C::Session,
        deadline: Option<Instant>,
    ) -> Result<HostRun, AuditError> {
        let mut verdicts = Vec::with_capacity(self.rules.len());

        for rule in self.rules {
            self.check_cancelled()?;

            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    warn!(rule = %rule.id, "host timeout exhausted");
                    return Ok(HostRun {
                        verdicts,
                        aborted: Some(self.timeout_message()),
                    });
                }
                session.set_timeout(Some(remaining));
            }

            let command = match render_command(&rule.command, self.password, self.injection) {
                Ok(command) => command,
                Err(e) => {
                    verdicts.push(error_verdict(rule, &e.to_string()));
                    continue;
                }
            };

            match session.run(&command) {
                Ok(result) => {
                    if !result.stderr.is_empty() {
                        warn!(rule = %rule.id, "command wrote to stderr");
                    }
                    let verdict = evaluate(rule, &result);
                    debug!(rule = %rule.id, status = verdict.status.as_str(), "rule evaluated");
                    verdicts.push(verdict);
                }
                Err(e) => {
                    let message = match e {
                        TransportError::Timeout => self.timeout_message(),
                        other => other.to_string(),
                    };
                    warn!(rule = %rule.id, error = %message, "transport failure; skipping remaining rules");
                    verdicts.push(error_verdict(rule, &message));
                    return Ok(HostRun {
                        verdicts,
                        aborted: Some(message),
                    });
                }
            }
        }

        Ok(HostRun {
            verdicts,
            aborted: None,
        })
    }

    fn timeout_message(&self) -> String {
        match self.host_timeout {
            Some(t) => format!("host timeout of {}s exceeded", t.as_secs()),
            None => "command timed out".to_string(),
        }
    }

    fn check_cancelled(&self) -> Result<(), AuditError> {
        if self.cancel.is_cancelled() {
            Err(AuditError::Cancelled)
        } else {
            Ok(())
        }
    }
}
