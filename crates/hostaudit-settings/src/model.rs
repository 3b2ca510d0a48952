use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_CONFIG_V1: &str = "hostaudit.config.v1";

/// `hostaudit.toml` schema v1.
///
/// Every field is optional; unset fields fall back to the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HostauditConfigV1 {
    /// Optional schema string for tooling (`hostaudit.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict` (default) or `lab`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Path of the YAML rule set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Hosts audited at the same time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    /// Budget for one host (connect plus all rules). `0` disables the bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_timeout_secs: Option<u64>,

    /// `stdin` (default) or `inline`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_injection: Option<String>,

    #[serde(default)]
    pub host_keys: HostKeysConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HostKeysConfig {
    /// `strict`, `pinned`, or `accept-any`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// OpenSSH `known_hosts` file used by the `strict` policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_hosts: Option<String>,

    /// Host -> lowercase hex SHA-256 of its host key, used by the `pinned` policy.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pins: BTreeMap<String, String>,
}
