//! The `audit` use case: resolve config, load the rule set, audit every host, build the report.

use crate::orchestrator::{CancelFlag, Orchestrator};
use anyhow::Context;
use hostaudit_domain::model::RuleDefinition;
use hostaudit_domain::policy::{CredentialInjection, EffectiveConfig, HostKeyPolicy};
use hostaudit_session::{Connector, HostTarget, Login, Secret, SshConnector};
use hostaudit_settings::{Overrides, expand_home};
use hostaudit_types::{AuditData, AuditReport, RunSummary, SCHEMA_REPORT_V1, ToolMeta, ids};
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Input for the audit use case.
#[derive(Clone, Debug)]
pub struct AuditInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Host entries as given (`host`, `host:port`, `[v6]:port`).
    pub hosts: Vec<String>,
    pub login: Login,
    /// Home directory used to expand `~/` in the known_hosts path.
    pub home: Option<PathBuf>,
    pub cancel: CancelFlag,
}

/// Everything resolved before the first connection is made.
#[derive(Clone, Debug)]
pub struct AuditPlan {
    pub effective: EffectiveConfig,
    pub rule_set: String,
    pub rules: Vec<RuleDefinition>,
    pub targets: Vec<HostTarget>,
}

/// Output from the audit use case.
#[derive(Clone, Debug)]
pub struct AuditOutput {
    pub report: AuditReport,
    pub exit_code: i32,
}

/// `0` when every host completed and every check passed, `2` otherwise.
pub fn audit_exit_code(summary: &RunSummary) -> i32 {
    if summary.all_passed() { 0 } else { 2 }
}

/// Resolve config, parse host targets, and load the rule set.
///
/// Any failure here is a tool error: nothing has been contacted yet.
pub fn prepare_audit(input: &AuditInput<'_>) -> anyhow::Result<AuditPlan> {
    let cfg = if input.config_text.trim().is_empty() {
        hostaudit_settings::HostauditConfigV1::default()
    } else {
        hostaudit_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = hostaudit_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let mut effective = resolved.effective;
    if let HostKeyPolicy::Strict { known_hosts } = &mut effective.host_keys {
        *known_hosts = expand_home(known_hosts, input.home.as_deref());
    }

    anyhow::ensure!(!input.hosts.is_empty(), "no hosts to audit");
    let targets = input
        .hosts
        .iter()
        .map(|h| {
            HostTarget::parse(h, effective.port).with_context(|| format!("invalid host `{h}`"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let rule_set = resolved
        .rules
        .context("no rule set configured; pass --rules or set `rules` in hostaudit.toml")?;
    let text = std::fs::read_to_string(&rule_set)
        .with_context(|| format!("read rule set: {rule_set}"))?;
    let rules = hostaudit_settings::parse_rules_yaml(&text)
        .with_context(|| format!("load rule set: {rule_set}"))?;
    anyhow::ensure!(!rules.is_empty(), "rule set {rule_set} contains no rules");

    if effective.credential_injection == CredentialInjection::Inline {
        warn!("inline credential injection: the password is visible in remote command lines");
    }
    if effective.host_keys == HostKeyPolicy::AcceptAny {
        warn!("host key policy accept-any: host identities are not verified");
    }

    Ok(AuditPlan {
        effective,
        rule_set,
        rules,
        targets,
    })
}

/// Audit the planned hosts through `connector` and build the report.
pub fn execute_plan<C: Connector>(
    plan: &AuditPlan,
    connector: &C,
    password: Option<&Secret>,
    cancel: CancelFlag,
) -> anyhow::Result<AuditOutput> {
    let started_at = OffsetDateTime::now_utc();
    info!(
        hosts = plan.targets.len(),
        rules = plan.rules.len(),
        profile = %plan.effective.profile,
        "starting audit"
    );

    let hosts = Orchestrator::new(connector, &plan.rules)
        .with_password(password)
        .with_injection(plan.effective.credential_injection)
        .with_host_timeout(plan.effective.host_timeout)
        .with_concurrency(plan.effective.concurrency)
        .with_cancel(cancel)
        .audit_hosts(&plan.targets)
        .context("audit hosts")?;

    let finished_at = OffsetDateTime::now_utc();
    let summary = RunSummary::from_reports(&hosts);
    let exit_code = audit_exit_code(&summary);

    let report = AuditReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        hosts,
        summary,
        data: AuditData {
            profile: plan.effective.profile.clone(),
            rule_set: Some(plan.rule_set.clone()),
            rules_loaded: u32::try_from(plan.rules.len()).unwrap_or(u32::MAX),
            host_key_policy: plan.effective.host_keys.name().to_string(),
            credential_injection: plan.effective.credential_injection.name().to_string(),
            concurrency: u32::try_from(plan.effective.concurrency).unwrap_or(u32::MAX),
        },
    };

    Ok(AuditOutput { report, exit_code })
}

/// Run the audit use case over SSH.
pub fn run_audit(input: AuditInput<'_>) -> anyhow::Result<AuditOutput> {
    let plan = prepare_audit(&input)?;
    let connector = SshConnector::new(
        input.login.clone(),
        plan.effective.host_keys.clone(),
        plan.effective.connect_timeout,
    );
    execute_plan(
        &plan,
        &connector,
        input.login.password.as_ref(),
        input.cancel.clone(),
    )
}
