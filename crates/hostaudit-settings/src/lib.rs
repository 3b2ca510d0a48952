//! Config parsing and profile/preset resolution, rule-set loading, and host lists.
//!
//! This crate is intentionally IO-free: it parses and resolves inputs provided as strings.

#![forbid(unsafe_code)]

mod hosts;
mod model;
mod presets;
mod resolve;
mod rules;

pub use hosts::{parse_host_list, parse_hosts_file};
pub use model::{HostKeysConfig, HostauditConfigV1, SCHEMA_CONFIG_V1};
pub use resolve::{Overrides, ResolvedConfig, expand_home};
pub use rules::parse_rules_yaml;

/// Parse `hostaudit.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<HostauditConfigV1> {
    let cfg: HostauditConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective run configuration (profile + config file + overrides).
pub fn resolve_config(
    cfg: HostauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
