use crate::{model::HostauditConfigV1, presets};
use anyhow::Context;
use hostaudit_domain::policy::{CredentialInjection, EffectiveConfig, HostKeyPolicy};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line values. Each one wins over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub rules: Option<String>,
    pub port: Option<u16>,
    pub concurrency: Option<u32>,
    pub host_key_policy: Option<String>,
    pub known_hosts: Option<String>,
    pub credential_injection: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    /// Rule set path, if either the config or the command line named one.
    pub rules: Option<String>,
}

pub fn resolve_config(
    cfg: HostauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile)
        .with_context(|| format!("unknown profile: {profile} (expected 'strict' or 'lab')"))?;

    if let Some(port) = overrides.port.or(cfg.port) {
        anyhow::ensure!(port != 0, "port must be between 1 and 65535");
        effective.port = port;
    }

    if let Some(concurrency) = overrides.concurrency.or(cfg.concurrency) {
        anyhow::ensure!(concurrency > 0, "concurrency must be at least 1");
        effective.concurrency = concurrency as usize;
    }

    if let Some(secs) = cfg.connect_timeout_secs {
        anyhow::ensure!(secs > 0, "connect_timeout_secs must be at least 1");
        effective.connect_timeout = Duration::from_secs(secs);
    }

    if let Some(secs) = cfg.host_timeout_secs {
        effective.host_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    if let Some(mode) = overrides
        .credential_injection
        .as_deref()
        .or(cfg.credential_injection.as_deref())
    {
        effective.credential_injection = parse_credential_injection(mode)?;
    }

    let policy = overrides
        .host_key_policy
        .as_deref()
        .or(cfg.host_keys.policy.as_deref());
    let known_hosts = overrides
        .known_hosts
        .as_deref()
        .or(cfg.host_keys.known_hosts.as_deref());

    effective.host_keys = match policy {
        None => effective.host_keys,
        Some("strict") => HostKeyPolicy::Strict {
            known_hosts: PathBuf::from(presets::DEFAULT_KNOWN_HOSTS),
        },
        Some("pinned") => HostKeyPolicy::Pinned {
            fingerprints: normalize_pins(&cfg.host_keys.pins)?,
        },
        Some("accept-any") => HostKeyPolicy::AcceptAny,
        Some(other) => anyhow::bail!(
            "unknown host key policy: {other} (expected strict|pinned|accept-any)"
        ),
    };
    if let (HostKeyPolicy::Strict { known_hosts: path }, Some(configured)) =
        (&mut effective.host_keys, known_hosts)
    {
        *path = PathBuf::from(configured);
    }

    Ok(ResolvedConfig {
        effective,
        rules: overrides.rules.or(cfg.rules),
    })
}

fn parse_credential_injection(v: &str) -> anyhow::Result<CredentialInjection> {
    match v {
        "stdin" => Ok(CredentialInjection::Stdin),
        "inline" => Ok(CredentialInjection::Inline),
        other => anyhow::bail!("unknown credential_injection: {other} (expected stdin|inline)"),
    }
}

fn normalize_pins(pins: &BTreeMap<String, String>) -> anyhow::Result<BTreeMap<String, String>> {
    anyhow::ensure!(
        !pins.is_empty(),
        "host key policy 'pinned' requires [host_keys.pins]"
    );
    pins.iter()
        .map(|(host, pin)| {
            let pin = pin.trim().to_ascii_lowercase();
            let valid = pin.len() == 64 && pin.bytes().all(|b| b.is_ascii_hexdigit());
            anyhow::ensure!(valid, "pin for {host} is not a SHA-256 hex digest");
            Ok((host.clone(), pin))
        })
        .collect()
}

/// Expand a leading `~/` against `home`. Paths without it are returned unchanged.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
